use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{Money, ProductSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
    /// Any status this client does not know about, shown verbatim
    Other(String),
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => OrderStatus::Pending,
            "COMPLETED" => OrderStatus::Completed,
            "CANCELLED" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(s),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Completed => write!(f, "COMPLETED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
            OrderStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub quantity: u32,
    #[serde(rename = "priceAtPurchase")]
    pub price_at_purchase: Money,
    pub item: ProductSummary,
}

impl OrderLine {
    pub fn line_total(&self) -> Money {
        self.price_at_purchase * self.quantity
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(rename = "totalAmount")]
    pub total_amount: Money,
    pub status: OrderStatus,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl Order {
    /// Placement time in local time, e.g. "March 15, 2024, 02:30 PM".
    /// Falls back to the raw string if the backend sent something unexpected.
    pub fn formatted_date(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.created_at) {
            Ok(dt) => dt
                .with_timezone(&Local)
                .format("%B %-d, %Y, %I:%M %p")
                .to_string(),
            Err(_) => self.created_at.clone(),
        }
    }

    /// Short id for list display ("Order #1a2b3c4d").
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}
