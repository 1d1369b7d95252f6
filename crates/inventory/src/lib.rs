//! Inventory repository.
//!
//! Owns every part and product of a session in insertion order and provides
//! lookup, search, update and delete over them. Pure in-memory logic: no IO, no
//! locking, one caller at a time.

pub mod inventory;
pub mod sample;
pub mod store;

pub use inventory::Inventory;
pub use store::{ArenaKey, OrderedStore};
