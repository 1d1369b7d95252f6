//! Value objects: equality by value, not identity.
//!
//! Parts and products carry the same stock block (`stock`, `min`, `max`). It is
//! modelled once here so both entity types share accessors and the bounds check.

use serde::{Deserialize, Serialize};

/// Inventory level of a part or product together with its allowed range.
///
/// Construction does not check `min <= stock <= max`; the form layer enforces
/// that before an entity is built.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevels {
    pub stock: u32,
    pub min: u32,
    pub max: u32,
}

impl StockLevels {
    pub const fn new(stock: u32, min: u32, max: u32) -> Self {
        Self { stock, min, max }
    }

    /// True when `min <= stock <= max`.
    pub fn within_bounds(&self) -> bool {
        self.min <= self.max && self.min <= self.stock && self.stock <= self.max
    }
}
