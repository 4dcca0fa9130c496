//! Promotional banners.
//!
//! Admin-managed banner documents plus the live stream the storefront
//! carousel renders: active banners only, highest priority first.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    documents::{Direction, Document, DocumentId, DocumentStore, DocumentStoreError, Predicate},
    subscription::Subscription,
};

/// Collection holding banner documents.
pub const BANNERS_COLLECTION: &str = "banners";

/// Errors from the banners service.
#[derive(Debug, Error)]
pub enum BannersError {
    #[error("storage error")]
    Store(#[from] DocumentStoreError),

    #[error("could not encode banner document")]
    Encode(#[from] serde_json::Error),
}

/// A promotional banner in document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: DocumentId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    pub is_active: bool,
    pub priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

/// A banner to be created; the store issues the id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBanner {
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    pub is_active: bool,
    pub priority: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

/// Banners service over the document store.
#[derive(Clone)]
pub struct BannersService {
    store: Arc<dyn DocumentStore>,
}

impl BannersService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a banner document.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store insert fails.
    pub async fn create_banner(&self, banner: NewBanner) -> Result<DocumentId, BannersError> {
        let document = serde_json::to_value(&banner)?;
        let id = self.store.insert(BANNERS_COLLECTION, document).await?;

        tracing::info!(banner = %id, title = %banner.title, "banner created");

        Ok(id)
    }

    /// Shallow-merge a patch into a banner document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store update fails.
    pub async fn update_banner(&self, id: &DocumentId, patch: Value) -> Result<(), BannersError> {
        self.store.update(BANNERS_COLLECTION, id, patch).await?;

        Ok(())
    }

    /// Delete a banner document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store delete fails.
    pub async fn delete_banner(&self, id: &DocumentId) -> Result<(), BannersError> {
        self.store.delete(BANNERS_COLLECTION, id).await?;

        Ok(())
    }

    /// Live list of every banner, highest priority first (admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the subscription.
    pub async fn watch_banners(&self) -> Result<Subscription<Vec<Banner>>, BannersError> {
        let documents = self
            .store
            .watch_ordered(BANNERS_COLLECTION, "priority", Direction::Descending)
            .await?;

        Ok(documents.map(|snapshot| decode_banners(snapshot)))
    }

    /// Live list of active banners, highest priority first (storefront view).
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the subscription.
    pub async fn watch_active_banners(&self) -> Result<Subscription<Vec<Banner>>, BannersError> {
        let documents = self
            .store
            .watch_filtered(
                BANNERS_COLLECTION,
                vec![Predicate::equals("isActive", true)],
                Some(("priority".to_string(), Direction::Descending)),
            )
            .await?;

        Ok(documents.map(|snapshot| decode_banners(snapshot)))
    }
}

fn decode_banners(documents: &[Document]) -> Vec<Banner> {
    documents
        .iter()
        .filter_map(|document| match banner_from_document(document) {
            Ok(banner) => Some(banner),
            Err(error) => {
                tracing::warn!(document = %document.id, %error, "skipping malformed banner document");
                None
            }
        })
        .collect()
}

fn banner_from_document(document: &Document) -> Result<Banner, serde_json::Error> {
    let mut data = document.data.clone();

    if let Value::Object(map) = &mut data {
        map.insert("id".to_string(), Value::String(document.id.to_string()));
    }

    serde_json::from_value(data)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::documents::MemoryDocumentStore;

    use super::*;

    fn banner(title: &str, active: bool, priority: i64) -> NewBanner {
        NewBanner {
            title: title.to_string(),
            description: String::new(),
            image_url: "https://cdn.example/banner.jpg".to_string(),
            link_url: None,
            is_active: active,
            priority,
            start_date: None,
            end_date: None,
            background_color: None,
            text_color: None,
        }
    }

    fn service() -> BannersService {
        BannersService::new(Arc::new(MemoryDocumentStore::new()))
    }

    #[tokio::test]
    async fn active_stream_filters_and_orders_by_priority() -> TestResult {
        let banners = service();

        banners.create_banner(banner("Low", true, 1)).await?;
        banners.create_banner(banner("Hidden", false, 9)).await?;
        banners.create_banner(banner("High", true, 5)).await?;

        let active = banners.watch_active_banners().await?;
        let titles: Vec<String> = active.current().iter().map(|b| b.title.clone()).collect();

        assert_eq!(titles, ["High", "Low"]);

        Ok(())
    }

    #[tokio::test]
    async fn admin_stream_includes_inactive_banners() -> TestResult {
        let banners = service();

        banners.create_banner(banner("Hidden", false, 9)).await?;
        banners.create_banner(banner("Shown", true, 1)).await?;

        let all = banners.watch_banners().await?;

        assert_eq!(all.current().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn deactivating_a_banner_drops_it_from_the_active_stream() -> TestResult {
        let banners = service();

        let id = banners.create_banner(banner("Promo", true, 3)).await?;
        let mut active = banners.watch_active_banners().await?;
        assert_eq!(active.current().len(), 1);

        banners
            .update_banner(&id, json!({ "isActive": false }))
            .await?;

        let snapshot = active.changed().await.ok_or("stream closed")?;
        assert!(snapshot.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_banner() -> TestResult {
        let banners = service();

        let id = banners.create_banner(banner("Promo", true, 3)).await?;
        banners.delete_banner(&id).await?;

        assert!(banners.watch_banners().await?.current().is_empty());

        Ok(())
    }
}
