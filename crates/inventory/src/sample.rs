//! Demonstration records loaded at start-up.

use stockroom_core::{PartId, ProductId, StockLevels};
use stockroom_parts::Part;
use stockroom_products::Product;

use crate::inventory::Inventory;

impl Inventory {
    /// Inventory pre-populated with three parts and three products.
    pub fn with_sample_data() -> Self {
        let mut inv = Inventory::new();

        let part_1 = inv.add_part(Part::in_house(
            PartId::new(1),
            "Part 1",
            1.99,
            StockLevels::new(18, 1, 100),
            104,
        ));
        let part_2 = inv.add_part(Part::in_house(
            PartId::new(2),
            "Part 2",
            2.99,
            StockLevels::new(19, 1, 100),
            105,
        ));
        let part_3 = inv.add_part(Part::outsourced(
            PartId::new(3),
            "Outsourced",
            3.99,
            StockLevels::new(10, 5, 100),
            "Vendor 1",
        ));

        let products = [
            (100, "Product 1", 20, vec![part_1, part_2]),
            (200, "Product 2", 29, vec![part_1, part_2, part_3]),
            (300, "Product 3", 30, vec![part_2]),
        ];
        for (id, name, stock, parts) in products {
            let mut product = Product::new(
                ProductId::new(id),
                name,
                9.99,
                StockLevels::new(stock, 5, 100),
            );
            product.set_associated_parts(parts);
            inv.add_product(product);
        }

        inv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Entity;

    #[test]
    fn sample_data_shape() {
        let inv = Inventory::with_sample_data();
        assert_eq!(inv.part_count(), 3);
        assert_eq!(inv.product_count(), 3);

        let (_, product_2) = inv.lookup_product(ProductId::new(200)).unwrap();
        let names: Vec<_> = inv
            .associated_parts(product_2)
            .into_iter()
            .map(|(_, p)| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["Part 1", "Part 2", "Outsourced"]);
    }

    #[test]
    fn sample_records_are_within_bounds() {
        let inv = Inventory::with_sample_data();
        assert!(inv.all_parts().all(|(_, p)| p.levels().within_bounds()));
        assert!(inv.all_products().all(|(_, p)| p.levels().within_bounds()));
        assert_eq!(inv.next_part_id(), PartId::new(4));
        assert_eq!(inv.next_product_id(), ProductId::new(301));
    }
}
