use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::quote_dto::QuoteResponse;
use crate::dto::rider_dto::RiderResponse;
use crate::models::order::{NewOrder, Order, OrderChanges, OrderStatus};
use crate::models::quote::Quote;
use crate::models::rider::Rider;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_order_status;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub quote_id: i64,
    pub rider_id: Option<i64>,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub payment_ref: String,
    #[serde(default)]
    pub payment_complete_status: bool,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        Self {
            quote_id: request.quote_id,
            rider_id: request.rider_id,
            payment_ref: request.payment_ref,
            payment_complete_status: request.payment_complete_status,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    #[validate(length(max = 32))]
    pub payment_ref: Option<String>,
    pub payment_complete_status: Option<bool>,
    #[validate(custom = "validate_order_status")]
    pub order_status: Option<String>,
    pub rider_id: Option<i64>,
}

impl TryFrom<UpdateOrderRequest> for OrderChanges {
    type Error = AppError;

    fn try_from(request: UpdateOrderRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            payment_ref: request.payment_ref,
            payment_complete_status: request.payment_complete_status,
            order_status: request
                .order_status
                .as_deref()
                .map(str::parse::<OrderStatus>)
                .transpose()?,
            rider_id: request.rider_id,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(custom = "validate_order_status")]
    pub order_status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AttachRiderRequest {
    pub rider_id: i64,
}

/// Order with its quote and rider resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: i64,
    pub tracking_number: Uuid,
    pub payment_ref: String,
    pub payment_complete_status: bool,
    pub order_status: OrderStatus,
    pub order_status_label: String,
    /// Statuses staff may still move the order to
    pub next_statuses: Vec<OrderStatus>,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>,
    pub quote: QuoteResponse,
    pub rider: Option<RiderResponse>,
}

impl OrderResponse {
    pub fn new(order: Order, quote: Quote, rider: Option<Rider>) -> Self {
        Self {
            id: order.id,
            tracking_number: order.tracking_number,
            payment_ref: order.payment_ref,
            payment_complete_status: order.payment_complete_status,
            order_status: order.order_status,
            order_status_label: order.order_status.label().to_string(),
            next_statuses: order.order_status.next_statuses(),
            created_ts: order.created_ts,
            updated_ts: order.updated_ts,
            quote: quote.into(),
            rider: rider.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_value_is_validated() {
        let request: UpdateStatusRequest =
            serde_json::from_value(serde_json::json!({ "order_status": "LOST" })).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("order_status"));

        let request: UpdateStatusRequest =
            serde_json::from_value(serde_json::json!({ "order_status": "TRANSIT" })).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_request_to_changes() {
        let request: UpdateOrderRequest = serde_json::from_value(serde_json::json!({
            "order_status": "warehouse",
            "payment_ref": "MPESA-9"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        let changes = OrderChanges::try_from(request).unwrap();
        assert_eq!(changes.order_status, Some(OrderStatus::Warehouse));
        assert_eq!(changes.payment_ref.as_deref(), Some("MPESA-9"));
        assert!(changes.rider_id.is_none());
    }
}
