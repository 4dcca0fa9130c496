//! In-memory document store.
//!
//! Process-local implementation of [`DocumentStore`] used by tests and
//! local development. After every mutation each matching watcher receives a
//! fresh full snapshot of its query, mirroring the wholesale-replace
//! contract of the hosted backend.

use std::{cmp::Ordering, sync::Mutex};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::watch;
use uuid::Uuid;

use crate::subscription::Subscription;

use super::{Direction, Document, DocumentId, DocumentStore, DocumentStoreError, Predicate};

static NULL: Value = Value::Null;

/// In-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    collections: FxHashMap<String, Vec<Document>>,
    watchers: Vec<Watcher>,
}

#[derive(Debug)]
struct Watcher {
    collection: String,
    predicates: Vec<Predicate>,
    order: Option<(String, Direction)>,
    tx: watch::Sender<Vec<Document>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, DocumentStoreError> {
        self.inner
            .lock()
            .map_err(|_| DocumentStoreError::Backend("poisoned store lock".to_string()))
    }
}

/// Resolve a dotted field path (`customerInfo.email`) inside a document.
fn lookup<'a>(data: &'a Value, path: &str) -> &'a Value {
    let mut current = data;

    for segment in path.split('.') {
        match current.get(segment) {
            Some(value) => current = value,
            None => return &NULL,
        }
    }

    current
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .unwrap_or(0.0)
            .total_cmp(&b.as_f64().unwrap_or(0.0)),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn matches(document: &Document, predicates: &[Predicate]) -> bool {
    predicates
        .iter()
        .all(|predicate| *lookup(&document.data, &predicate.field) == predicate.equals)
}

fn snapshot(
    collections: &FxHashMap<String, Vec<Document>>,
    collection: &str,
    predicates: &[Predicate],
    order: Option<&(String, Direction)>,
) -> Vec<Document> {
    let mut documents: Vec<Document> = collections
        .get(collection)
        .map(|documents| {
            documents
                .iter()
                .filter(|document| matches(document, predicates))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    if let Some((field, direction)) = order {
        // Stable sort: documents that compare equal keep insertion order.
        documents.sort_by(|a, b| {
            let ordering = compare(lookup(&a.data, field), lookup(&b.data, field));

            match direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });
    }

    documents
}

fn publish(inner: &mut Inner, collection: &str) {
    let Inner {
        collections,
        watchers,
    } = inner;

    watchers.retain(|watcher| !watcher.tx.is_closed());

    for watcher in watchers.iter().filter(|w| w.collection == collection) {
        let documents = snapshot(
            collections,
            &watcher.collection,
            &watcher.predicates,
            watcher.order.as_ref(),
        );

        // A receiver dropped between the retain and here is harmless.
        _ = watcher.tx.send(documents);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        document: Value,
    ) -> Result<DocumentId, DocumentStoreError> {
        if !document.is_object() {
            return Err(DocumentStoreError::InvalidDocument);
        }

        let id = DocumentId::new(Uuid::now_v7().to_string());

        let mut inner = self.lock()?;

        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                data: document,
            });

        publish(&mut inner, collection);

        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        patch: Value,
    ) -> Result<(), DocumentStoreError> {
        let Value::Object(patch) = patch else {
            return Err(DocumentStoreError::InvalidDocument);
        };

        let mut inner = self.lock()?;

        let document = inner
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| document.id == *id))
            .ok_or(DocumentStoreError::NotFound)?;

        let Value::Object(data) = &mut document.data else {
            return Err(DocumentStoreError::InvalidDocument);
        };

        for (key, value) in patch {
            data.insert(key, value);
        }

        publish(&mut inner, collection);

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), DocumentStoreError> {
        let mut inner = self.lock()?;

        let documents = inner
            .collections
            .get_mut(collection)
            .ok_or(DocumentStoreError::NotFound)?;

        let position = documents
            .iter()
            .position(|document| document.id == *id)
            .ok_or(DocumentStoreError::NotFound)?;

        documents.remove(position);

        publish(&mut inner, collection);

        Ok(())
    }

    async fn watch_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
    ) -> Result<Subscription<Vec<Document>>, DocumentStoreError> {
        self.watch_filtered(
            collection,
            Vec::new(),
            Some((field.to_string(), direction)),
        )
        .await
    }

    async fn watch_filtered(
        &self,
        collection: &str,
        predicates: Vec<Predicate>,
        order: Option<(String, Direction)>,
    ) -> Result<Subscription<Vec<Document>>, DocumentStoreError> {
        let mut inner = self.lock()?;

        let initial = snapshot(&inner.collections, collection, &predicates, order.as_ref());
        let (tx, rx) = watch::channel(initial);

        inner.watchers.push(Watcher {
            collection: collection.to_string(),
            predicates,
            order,
            tx,
        });

        Ok(Subscription::new(rx))
    }
}
