//! Products
//!
//! Catalog snapshots as delivered by the hosted document store. The cart
//! never owns products; it copies the display fields it needs at add time.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque product identifier issued by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a raw store identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A point-in-time product snapshot.
///
/// Field names match the document form used by the admin surface, so a
/// product document round-trips through serde unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, name: &str, price_minor: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(price_minor, 2),
            image: format!("https://cdn.example/{id}.jpg"),
            category: "calcados".to_string(),
            size: None,
            brand: None,
            stock: None,
            featured: None,
        }
    }

    #[test]
    fn optional_fields_absent_in_serialized_form() -> TestResult {
        let value = serde_json::to_value(product("p1", "Tênis", 19990))?;

        assert!(value.get("size").is_none());
        assert!(value.get("brand").is_none());
        assert!(value.get("stock").is_none());
        assert!(value.get("featured").is_none());

        Ok(())
    }

    #[test]
    fn deserializes_document_without_optional_fields() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{
                "id": "p1",
                "name": "Tênis",
                "description": "Corrida",
                "price": 199.9,
                "image": "https://cdn.example/p1.jpg",
                "category": "calcados"
            }"#,
        )?;

        assert_eq!(product.id, ProductId::from("p1"));
        assert_eq!(product.price, Decimal::new(1999, 1));
        assert!(product.size.is_none());

        Ok(())
    }
}
