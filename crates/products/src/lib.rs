//! Products domain module.
//!
//! A product is a sellable item assembled from parts. It references the parts it
//! uses by inventory key and never owns them.

pub mod product;

pub use product::{Product, ProductKey};
