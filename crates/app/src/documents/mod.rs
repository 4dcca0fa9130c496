//! Document store collaborator.
//!
//! The hosted backend is reduced to the five operations the storefront
//! actually uses: insert, partial update, delete, and two live-snapshot
//! queries. Documents are opaque JSON maps; typed services
//! ([`crate::catalog`], [`crate::banners`], [`crate::orders`]) decode at
//! the edge.

pub mod memory;

use std::fmt::{Display, Formatter, Result as FmtResult};

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::subscription::Subscription;

pub use memory::MemoryDocumentStore;

/// Opaque document identifier issued by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap a raw store identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// A stored document: id plus its JSON data.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub data: Value,
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// An equality predicate on a document field.
///
/// The field may be a dotted path into nested objects, e.g.
/// `customerInfo.email`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub equals: Value,
}

impl Predicate {
    /// `field == value`.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            equals: value.into(),
        }
    }
}

/// Errors from the document store collaborator.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// The referenced document does not exist.
    #[error("document not found")]
    NotFound,

    /// The payload was not a JSON object.
    #[error("document must be a JSON object")]
    InvalidDocument,

    /// The backend rejected or failed the operation.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Narrow interface to the hosted document store.
#[automock]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning the store-issued id.
    async fn insert(&self, collection: &str, document: Value)
    -> Result<DocumentId, DocumentStoreError>;

    /// Shallow-merge `patch` into an existing document.
    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        patch: Value,
    ) -> Result<(), DocumentStoreError>;

    /// Delete a document.
    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), DocumentStoreError>;

    /// Watch a whole collection ordered by `field`.
    async fn watch_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
    ) -> Result<Subscription<Vec<Document>>, DocumentStoreError>;

    /// Watch the documents matching every predicate, optionally ordered.
    async fn watch_filtered(
        &self,
        collection: &str,
        predicates: Vec<Predicate>,
        order: Option<(String, Direction)>,
    ) -> Result<Subscription<Vec<Document>>, DocumentStoreError>;
}
