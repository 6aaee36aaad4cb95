use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog entry. Rows are seeded by migration and only ever read through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    /// Serialized as a decimal string (e.g. "25.99") so no precision is lost.
    pub price: Decimal,
    pub category: String,
}

impl Product {
    pub fn new(id: i32, name: &str, price: Decimal, category: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
            category: category.to_string(),
        }
    }
}

/// Built-in catalog served when no store is configured.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product::new(1, "DevOps T-Shirt", Decimal::new(2599, 2), "apparel"),
        Product::new(2, "Kubernetes Mug", Decimal::new(1550, 2), "accessories"),
        Product::new(3, "Docker Stickers", Decimal::new(599, 2), "accessories"),
        Product::new(4, "Terraform Guide", Decimal::new(3999, 2), "books"),
        Product::new(5, "Azure Certification", Decimal::new(19999, 2), "courses"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sample_catalog_has_five_items_in_declared_order() {
        let ids: Vec<i32> = sample_products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn sample_prices_keep_two_decimals() {
        let mug = &sample_products()[1];
        assert_eq!(mug.name, "Kubernetes Mug");
        assert_eq!(mug.price.to_string(), "15.50");
    }

    #[test]
    fn price_goes_over_the_wire_as_a_string() {
        let json = serde_json::to_value(&sample_products()[0]).unwrap();
        assert_eq!(json["price"], "25.99");
        assert_eq!(json["category"], "apparel");
    }

    #[test]
    fn numeric_price_is_accepted_on_input() {
        let p: Product = serde_json::from_str(
            r#"{"id": 9, "name": "Helm Hoodie", "price": 49.5, "category": "apparel"}"#,
        )
        .unwrap();
        assert_eq!(p.price, Decimal::from_str("49.5").unwrap());
    }
}
