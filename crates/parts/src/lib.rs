//! Parts domain module.
//!
//! A part is either manufactured in house (identified by a machine id) or bought
//! from an outside company. The variant is fixed when the part is built.

pub mod part;

pub use part::{Part, PartKey, PartKind, PartSource};
