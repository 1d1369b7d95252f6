use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, ProductId, StockLevels};
use stockroom_parts::PartKey;

/// Arena handle of a product stored in an inventory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(u64);

impl ProductKey {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl core::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "product#{}", self.0)
    }
}

/// A product and the parts associated with it.
///
/// Associations are an ordered list of part keys. The same part may appear more
/// than once; nothing here checks that a key still resolves to a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
    #[serde(flatten)]
    levels: StockLevels,
    /// Keys only mean something inside the inventory that issued them.
    #[serde(skip)]
    associated_parts: Vec<PartKey>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: f64, levels: StockLevels) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            levels,
            associated_parts: Vec::new(),
        }
    }

    pub fn stock(&self) -> u32 {
        self.levels.stock
    }

    pub fn min(&self) -> u32 {
        self.levels.min
    }

    pub fn max(&self) -> u32 {
        self.levels.max
    }

    pub fn set_id(&mut self, id: ProductId) {
        self.id = id;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_price(&mut self, price: f64) {
        self.price = price;
    }

    pub fn set_stock(&mut self, stock: u32) {
        self.levels.stock = stock;
    }

    pub fn set_min(&mut self, min: u32) {
        self.levels.min = min;
    }

    pub fn set_max(&mut self, max: u32) {
        self.levels.max = max;
    }

    /// Append a part reference. Duplicates are kept.
    pub fn add_associated_part(&mut self, part: PartKey) {
        self.associated_parts.push(part);
    }

    /// Remove the first reference to `part`. Returns whether one was removed.
    pub fn remove_associated_part(&mut self, part: PartKey) -> bool {
        match self.associated_parts.iter().position(|k| *k == part) {
            Some(index) => {
                self.associated_parts.remove(index);
                true
            }
            None => false,
        }
    }

    /// Associated part references in insertion order.
    pub fn all_associated_parts(&self) -> &[PartKey] {
        &self.associated_parts
    }

    pub fn has_associated_parts(&self) -> bool {
        !self.associated_parts.is_empty()
    }

    /// Replace every association, keeping the given order.
    pub fn set_associated_parts(&mut self, parts: impl IntoIterator<Item = PartKey>) {
        self.associated_parts = parts.into_iter().collect();
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn levels(&self) -> StockLevels {
        self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new(ProductId::new(100), "Product 1", 9.99, StockLevels::new(20, 5, 100))
    }

    #[test]
    fn new_product_has_no_associations() {
        let product = product();
        assert!(product.all_associated_parts().is_empty());
        assert!(!product.has_associated_parts());
    }

    #[test]
    fn associations_keep_insertion_order() {
        let mut product = product();
        product.add_associated_part(PartKey::from_raw(3));
        product.add_associated_part(PartKey::from_raw(1));
        product.add_associated_part(PartKey::from_raw(2));

        assert_eq!(
            product.all_associated_parts(),
            &[PartKey::from_raw(3), PartKey::from_raw(1), PartKey::from_raw(2)]
        );
    }

    #[test]
    fn duplicate_association_is_kept_and_removed_once() {
        let mut product = product();
        let key = PartKey::from_raw(1);
        product.add_associated_part(key);
        product.add_associated_part(key);
        assert_eq!(product.all_associated_parts().len(), 2);

        assert!(product.remove_associated_part(key));
        assert_eq!(product.all_associated_parts(), &[key]);
    }

    #[test]
    fn removing_unknown_part_reports_false() {
        let mut product = product();
        product.add_associated_part(PartKey::from_raw(1));
        assert!(!product.remove_associated_part(PartKey::from_raw(9)));
        assert_eq!(product.all_associated_parts().len(), 1);
    }

    #[test]
    fn associations_are_not_serialized() {
        let mut product = product();
        product.add_associated_part(PartKey::from_raw(1));
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 100);
        assert_eq!(json["max"], 100);
        assert!(json.get("associated_parts").is_none());
    }

    #[test]
    fn remove_takes_first_occurrence() {
        let mut product = product();
        let a = PartKey::from_raw(1);
        let b = PartKey::from_raw(2);
        product.set_associated_parts([a, b, a]);

        assert!(product.remove_associated_part(a));
        assert_eq!(product.all_associated_parts(), &[b, a]);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: removing one key drops exactly one occurrence and leaves
            /// the relative order of the rest untouched.
            #[test]
            fn remove_drops_exactly_one_occurrence(
                raw in proptest::collection::vec(0u64..5, 0..20),
                target in 0u64..5
            ) {
                let mut product = product();
                product.set_associated_parts(raw.iter().copied().map(PartKey::from_raw));
                let target = PartKey::from_raw(target);

                let before = product.all_associated_parts().to_vec();
                let removed = product.remove_associated_part(target);

                let mut expected = before.clone();
                if let Some(i) = expected.iter().position(|k| *k == target) {
                    expected.remove(i);
                }

                prop_assert_eq!(removed, before.contains(&target));
                prop_assert_eq!(product.all_associated_parts(), expected.as_slice());
            }
        }
    }
}
