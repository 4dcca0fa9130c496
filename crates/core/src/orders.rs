//! Orders
//!
//! Order payloads in the document form the store persists. An order is
//! created once at checkout submission; its status is mutated only by the
//! admin surface afterwards, never by the cart core.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{cart::LineItem, products::ProductId, profile::CustomerProfile};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let label = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };

        f.write_str(label)
    }
}

/// One ordered line in document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image_url: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl OrderItem {
    /// Price × quantity for this line.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<&LineItem> for OrderItem {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.product_id.clone(),
            product_name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
            image_url: line.image.clone(),
            category: line.category.clone(),
            size: line.size.clone(),
            brand: line.brand.clone(),
        }
    }
}

/// A composed order, ready for persistence and message rendering.
///
/// `customer` is `None` for guest checkouts, which can only reach the
/// messaging handoff, never the document store. Timestamps are added by the
/// persistence layer at insert time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(rename = "customerInfo", skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerProfile>,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
