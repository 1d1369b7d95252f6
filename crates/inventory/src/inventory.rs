use stockroom_core::{DomainResult, Entity, PartId, ProductId};
use stockroom_parts::{Part, PartKey};
use stockroom_products::{Product, ProductKey};

use crate::store::OrderedStore;

/// Repository of all parts and products.
///
/// Domain ids are not checked for uniqueness; the store keys are the identity.
/// Deleting a part leaves any product references to it in place, and
/// [`Inventory::associated_parts`] skips such dangling keys.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    parts: OrderedStore<PartKey, Part>,
    products: OrderedStore<ProductKey, Product>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_part(&mut self, part: Part) -> PartKey {
        self.parts.push(part)
    }

    pub fn add_product(&mut self, product: Product) -> ProductKey {
        self.products.push(product)
    }

    pub fn part(&self, key: PartKey) -> Option<&Part> {
        self.parts.get(key)
    }

    pub fn product(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    pub fn product_mut(&mut self, key: ProductKey) -> Option<&mut Product> {
        self.products.get_mut(key)
    }

    /// First part with `id` in insertion order.
    pub fn lookup_part(&self, id: PartId) -> Option<(PartKey, &Part)> {
        self.parts.iter().find(|(_, part)| part.id() == id)
    }

    /// Parts whose name contains `fragment` (case-sensitive), in insertion order.
    pub fn lookup_part_by_name(&self, fragment: &str) -> Vec<(PartKey, &Part)> {
        self.parts
            .iter()
            .filter(|(_, part)| part.name().contains(fragment))
            .collect()
    }

    /// First product with `id` in insertion order.
    pub fn lookup_product(&self, id: ProductId) -> Option<(ProductKey, &Product)> {
        self.products.iter().find(|(_, product)| product.id() == id)
    }

    /// Products whose name contains `fragment` (case-sensitive), in insertion order.
    pub fn lookup_product_by_name(&self, fragment: &str) -> Vec<(ProductKey, &Product)> {
        self.products
            .iter()
            .filter(|(_, product)| product.name().contains(fragment))
            .collect()
    }

    /// Replace the part behind `key`. Products referencing the key see the new part.
    pub fn update_part(&mut self, key: PartKey, part: Part) -> bool {
        self.parts.replace(key, part).is_some()
    }

    /// Replace the part at a position in iteration order.
    pub fn update_part_at(&mut self, index: usize, part: Part) -> DomainResult<PartKey> {
        self.parts.replace_at(index, part)
    }

    pub fn update_product(&mut self, key: ProductKey, product: Product) -> bool {
        self.products.replace(key, product).is_some()
    }

    pub fn update_product_at(&mut self, index: usize, product: Product) -> DomainResult<ProductKey> {
        self.products.replace_at(index, product)
    }

    pub fn position_of_part(&self, key: PartKey) -> Option<usize> {
        self.parts.position(key)
    }

    pub fn position_of_product(&self, key: ProductKey) -> Option<usize> {
        self.products.position(key)
    }

    /// Remove a part. `false` when nothing is selected or the key is unknown.
    ///
    /// Products keep their references to the removed key.
    pub fn delete_part(&mut self, key: Option<PartKey>) -> bool {
        key.and_then(|key| self.parts.remove(key)).is_some()
    }

    /// Remove a product. `false` when nothing is selected or the key is unknown.
    ///
    /// Does not look at the product's associations; callers guard that.
    pub fn delete_product(&mut self, key: Option<ProductKey>) -> bool {
        key.and_then(|key| self.products.remove(key)).is_some()
    }

    pub fn all_parts(&self) -> impl Iterator<Item = (PartKey, &Part)> + '_ {
        self.parts.iter()
    }

    pub fn all_products(&self) -> impl Iterator<Item = (ProductKey, &Product)> + '_ {
        self.products.iter()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.products.is_empty()
    }

    /// Resolve a product's associations to live parts, skipping deleted ones.
    pub fn associated_parts<'a>(&'a self, product: &'a Product) -> Vec<(PartKey, &'a Part)> {
        product
            .all_associated_parts()
            .iter()
            .filter_map(|key| self.parts.get(*key).map(|part| (*key, part)))
            .collect()
    }

    /// Id for a new part: one more than the largest existing part id, or 1.
    pub fn next_part_id(&self) -> PartId {
        PartId::next_after(self.parts.iter().map(|(_, part)| part.id()))
    }

    /// Id for a new product: one more than the largest existing product id, or 1.
    pub fn next_product_id(&self) -> ProductId {
        ProductId::next_after(self.products.iter().map(|(_, product)| product.id()))
    }
}
