//! Order persistence.
//!
//! Writes composed orders to the document store and keeps the per-customer
//! aggregate record in step. Guest drafts never reach this service; a
//! persisted order always carries full customer details.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use vitrine::{
    orders::{OrderDraft, OrderItem, OrderStatus},
    profile::CustomerProfile,
};

use crate::{
    documents::{Direction, Document, DocumentId, DocumentStore, DocumentStoreError, Predicate},
    subscription::Subscription,
};

/// Collection holding order documents.
pub const ORDERS_COLLECTION: &str = "orders";

/// Collection holding per-customer aggregate documents.
pub const CUSTOMERS_COLLECTION: &str = "customers";

/// Errors from the orders service.
#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// The draft has no customer details; only guest flows produce these.
    #[error("order draft has no customer details")]
    MissingCustomer,

    #[error("storage error")]
    Store(#[from] DocumentStoreError),

    #[error("could not encode order document")]
    Encode(#[from] serde_json::Error),
}

/// A persisted order, as read back from the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: DocumentId,
    #[serde(rename = "customerInfo")]
    pub customer: CustomerProfile,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Orders service over the document store.
#[derive(Clone)]
pub struct OrdersService {
    store: Arc<dyn DocumentStore>,
}

impl OrdersService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist a composed order and update the customer aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::MissingCustomer`] for guest drafts,
    /// or a store/encoding error. The order insert and the customer upsert
    /// are separate writes; a failed upsert leaves the order in place.
    pub async fn place_order(&self, draft: &OrderDraft) -> Result<DocumentId, OrdersServiceError> {
        let customer = draft
            .customer
            .as_ref()
            .ok_or(OrdersServiceError::MissingCustomer)?;

        let now = serde_json::to_value(Timestamp::now())?;

        let mut document = serde_json::to_value(draft)?;
        if let Value::Object(map) = &mut document {
            map.insert("createdAt".to_string(), now.clone());
            map.insert("updatedAt".to_string(), now.clone());
        }

        let order_id = self.store.insert(ORDERS_COLLECTION, document).await?;

        tracing::info!(
            order = %order_id,
            customer = %customer.phone,
            total = %draft.total,
            "order placed",
        );

        self.upsert_customer(customer, &order_id, draft.total, &now)
            .await?;

        Ok(order_id)
    }

    /// Move an order to a new lifecycle status (admin surface).
    ///
    /// # Errors
    ///
    /// Returns an error if the order is unknown or the store update fails.
    pub async fn update_status(
        &self,
        id: &DocumentId,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError> {
        let now = serde_json::to_value(Timestamp::now())?;

        self.store
            .update(
                ORDERS_COLLECTION,
                id,
                json!({ "status": status, "updatedAt": now }),
            )
            .await?;

        tracing::info!(order = %id, %status, "order status updated");

        Ok(())
    }

    /// Live list of every order, newest first (admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the subscription.
    pub async fn watch_orders(&self) -> Result<Subscription<Vec<Order>>, OrdersServiceError> {
        let documents = self
            .store
            .watch_ordered(ORDERS_COLLECTION, "createdAt", Direction::Descending)
            .await?;

        Ok(documents.map(|snapshot| decode_orders(snapshot)))
    }

    /// Live list of one customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the subscription.
    pub async fn watch_customer_orders(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Subscription<Vec<Order>>, OrdersServiceError> {
        let documents = self
            .store
            .watch_filtered(
                ORDERS_COLLECTION,
                vec![
                    Predicate::equals("customerInfo.email", email),
                    Predicate::equals("customerInfo.phone", phone),
                ],
                Some(("createdAt".to_string(), Direction::Descending)),
            )
            .await?;

        Ok(documents.map(|snapshot| decode_orders(snapshot)))
    }

    /// Create or refresh the aggregate record keyed by phone number.
    async fn upsert_customer(
        &self,
        customer: &CustomerProfile,
        order_id: &DocumentId,
        total: Decimal,
        now: &Value,
    ) -> Result<(), OrdersServiceError> {
        let existing = self
            .store
            .watch_filtered(
                CUSTOMERS_COLLECTION,
                vec![Predicate::equals("phone", customer.phone.as_str())],
                None,
            )
            .await?
            .current();

        let email = customer.email.clone().unwrap_or_default();

        match existing.first() {
            Some(record) => {
                let orders = record.data["totalOrders"].as_u64().unwrap_or(0) + 1;
                let spent: Decimal =
                    serde_json::from_value(record.data["totalSpent"].clone()).unwrap_or_default();

                self.store
                    .update(
                        CUSTOMERS_COLLECTION,
                        &record.id,
                        json!({
                            "name": customer.name,
                            "email": email,
                            "address": customer.address,
                            "lastOrderId": order_id.as_str(),
                            "lastOrderDate": now,
                            "totalOrders": orders,
                            "totalSpent": spent + total,
                            "updatedAt": now,
                        }),
                    )
                    .await?;
            }
            None => {
                self.store
                    .insert(
                        CUSTOMERS_COLLECTION,
                        json!({
                            "name": customer.name,
                            "phone": customer.phone,
                            "email": email,
                            "address": customer.address,
                            "lastOrderId": order_id.as_str(),
                            "lastOrderDate": now,
                            "totalOrders": 1,
                            "totalSpent": total,
                            "createdAt": now,
                            "updatedAt": now,
                        }),
                    )
                    .await?;
            }
        }

        Ok(())
    }
}

fn decode_orders(documents: &[Document]) -> Vec<Order> {
    documents
        .iter()
        .filter_map(|document| match order_from_document(document) {
            Ok(order) => Some(order),
            Err(error) => {
                tracing::warn!(document = %document.id, %error, "skipping malformed order document");
                None
            }
        })
        .collect()
}

fn order_from_document(document: &Document) -> Result<Order, serde_json::Error> {
    let mut data = document.data.clone();

    if let Value::Object(map) = &mut data {
        map.insert("id".to_string(), Value::String(document.id.to_string()));
    }

    serde_json::from_value(data)
}
