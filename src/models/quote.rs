//! Quote model
//!
//! A quote is a client's shipment request waiting for staff pricing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Quote - maps to the quotes table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: i64,
    pub item_name: String,
    pub item_description: String,
    pub location_from: String,
    pub location_to: String,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub estimated_cost: Option<i64>,
    pub client_review_status: bool,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewQuote {
    pub item_name: String,
    pub item_description: String,
    pub location_from: String,
    pub location_to: String,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub estimated_cost: Option<i64>,
}

/// Field changes for an existing quote. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct QuoteChanges {
    pub item_name: Option<String>,
    pub item_description: Option<String>,
    pub location_from: Option<String>,
    pub location_to: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub estimated_cost: Option<i64>,
    pub client_review_status: Option<bool>,
}

impl QuoteChanges {
    /// Applies the changes on top of a stored quote
    pub fn apply(self, mut quote: Quote) -> Quote {
        if let Some(v) = self.item_name {
            quote.item_name = v;
        }
        if let Some(v) = self.item_description {
            quote.item_description = v;
        }
        if let Some(v) = self.location_from {
            quote.location_from = v;
        }
        if let Some(v) = self.location_to {
            quote.location_to = v;
        }
        if self.estimated_delivery.is_some() {
            quote.estimated_delivery = self.estimated_delivery;
        }
        if self.estimated_cost.is_some() {
            quote.estimated_cost = self.estimated_cost;
        }
        if let Some(v) = self.client_review_status {
            quote.client_review_status = v;
        }
        quote
    }
}
