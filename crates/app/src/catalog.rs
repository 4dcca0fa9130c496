//! Catalog service.
//!
//! Product CRUD for the admin surface plus the live product stream the
//! storefront renders. Each snapshot from [`CatalogService::watch_products`]
//! replaces the previous view wholesale; documents that fail to decode are
//! logged and skipped rather than poisoning the stream.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use vitrine::products::Product;

use crate::{
    documents::{Direction, Document, DocumentId, DocumentStore, DocumentStoreError},
    subscription::Subscription,
};

/// Collection holding product documents.
pub const PRODUCTS_COLLECTION: &str = "products";

/// Errors from the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("storage error")]
    Store(#[from] DocumentStoreError),

    #[error("could not encode product document")]
    Encode(#[from] serde_json::Error),
}

/// A product to be created; the store issues the id.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// Partial product update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// Catalog service over the document store.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a product document.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store insert fails.
    pub async fn create_product(&self, product: NewProduct) -> Result<DocumentId, CatalogError> {
        let document = serde_json::to_value(&product)?;
        let id = self.store.insert(PRODUCTS_COLLECTION, document).await?;

        tracing::info!(product = %id, name = %product.name, "product created");

        Ok(id)
    }

    /// Apply a partial update to a product document.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store update fails.
    pub async fn update_product(
        &self,
        id: &DocumentId,
        update: ProductUpdate,
    ) -> Result<(), CatalogError> {
        let patch = serde_json::to_value(&update)?;
        self.store.update(PRODUCTS_COLLECTION, id, patch).await?;

        Ok(())
    }

    /// Delete a product document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store delete fails.
    pub async fn delete_product(&self, id: &DocumentId) -> Result<(), CatalogError> {
        self.store.delete(PRODUCTS_COLLECTION, id).await?;

        tracing::info!(product = %id, "product deleted");

        Ok(())
    }

    /// Live product list ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the subscription.
    pub async fn watch_products(&self) -> Result<Subscription<Vec<Product>>, CatalogError> {
        let documents = self
            .store
            .watch_ordered(PRODUCTS_COLLECTION, "name", Direction::Ascending)
            .await?;

        Ok(documents.map(|snapshot| decode_all(snapshot, product_from_document)))
    }
}

/// Decode every document in a snapshot, skipping (and logging) bad ones.
pub(crate) fn decode_all<T>(
    documents: &[Document],
    decode: fn(&Document) -> Option<T>,
) -> Vec<T> {
    documents.iter().filter_map(decode).collect()
}

/// Decode a product document, injecting the document id.
pub(crate) fn product_from_document(document: &Document) -> Option<Product> {
    match decode_with_id(document) {
        Ok(product) => Some(product),
        Err(error) => {
            tracing::warn!(document = %document.id, %error, "skipping malformed product document");
            None
        }
    }
}

fn decode_with_id(document: &Document) -> Result<Product, serde_json::Error> {
    let mut data = document.data.clone();

    if let Value::Object(map) = &mut data {
        map.insert("id".to_string(), Value::String(document.id.to_string()));
    }

    serde_json::from_value(data)
}
