use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::quote::{NewQuote, Quote, QuoteChanges};
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub item_name: String,
    #[validate(length(min = 1, max = 300), custom = "validate_not_blank")]
    pub item_description: String,
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub location_from: String,
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub location_to: String,
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[validate(range(min = 0))]
    pub estimated_cost: Option<i64>,
}

impl From<CreateQuoteRequest> for NewQuote {
    fn from(request: CreateQuoteRequest) -> Self {
        Self {
            item_name: request.item_name,
            item_description: request.item_description,
            location_from: request.location_from,
            location_to: request.location_to,
            estimated_delivery: request.estimated_delivery,
            estimated_cost: request.estimated_cost,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateQuoteRequest {
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub item_name: Option<String>,
    #[validate(length(min = 1, max = 300), custom = "validate_not_blank")]
    pub item_description: Option<String>,
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub location_from: Option<String>,
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub location_to: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[validate(range(min = 0))]
    pub estimated_cost: Option<i64>,
    pub client_review_status: Option<bool>,
}

impl From<UpdateQuoteRequest> for QuoteChanges {
    fn from(request: UpdateQuoteRequest) -> Self {
        Self {
            item_name: request.item_name,
            item_description: request.item_description,
            location_from: request.location_from,
            location_to: request.location_to,
            estimated_delivery: request.estimated_delivery,
            estimated_cost: request.estimated_cost,
            client_review_status: request.client_review_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
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

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            id: quote.id,
            item_name: quote.item_name,
            item_description: quote.item_description,
            location_from: quote.location_from,
            location_to: quote.location_to,
            estimated_delivery: quote.estimated_delivery,
            estimated_cost: quote.estimated_cost,
            client_review_status: quote.client_review_status,
            created_ts: quote.created_ts,
            updated_ts: quote.updated_ts,
            user_id: quote.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_field_limits() {
        let request: CreateQuoteRequest = serde_json::from_value(serde_json::json!({
            "item_name": "a".repeat(33),
            "item_description": "x",
            "location_from": "Nairobi",
            "location_to": "Mombasa",
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("item_name"));

        let request: CreateQuoteRequest = serde_json::from_value(serde_json::json!({
            "item_name": "Laptop",
            "item_description": "d".repeat(300),
            "location_from": "Nairobi",
            "location_to": "Mombasa",
            "estimated_cost": -5,
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("estimated_cost"));
        assert!(!errors.field_errors().contains_key("item_description"));
    }

    #[test]
    fn test_partial_update_is_valid() {
        let request: UpdateQuoteRequest =
            serde_json::from_value(serde_json::json!({ "estimated_cost": 1500 })).unwrap();
        assert!(request.validate().is_ok());
        let changes = QuoteChanges::from(request);
        assert_eq!(changes.estimated_cost, Some(1500));
        assert!(changes.item_name.is_none());
    }
}
