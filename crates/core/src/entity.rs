//! Entity trait: a domain id plus the shared catalogue fields.

use crate::value_object::StockLevels;

/// Entity marker + minimal interface.
///
/// The domain id returned here is caller-assigned and is not guaranteed to be
/// unique; storage identity is handled by the inventory's arena keys.
pub trait Entity {
    /// Strongly-typed domain identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the domain identifier.
    fn id(&self) -> Self::Id;

    /// Display name used by name searches.
    fn name(&self) -> &str;

    /// Unit price.
    fn price(&self) -> f64;

    /// Stock level with its configured bounds.
    fn levels(&self) -> StockLevels;
}
