//! Order model
//!
//! An order binds one quote to at most one rider and carries the delivery
//! status. The status is a small state machine: it only moves forward along
//! PLACED -> WAREHOUSE -> RELEASED -> TRANSIT -> DELIVERED.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Delivery status - maps to the `order_status` ENUM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[sqlx(type_name = "order_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Placed,
    Warehouse,
    Released,
    Transit,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Warehouse,
        OrderStatus::Released,
        OrderStatus::Transit,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Warehouse => "WAREHOUSE",
            OrderStatus::Released => "RELEASED",
            OrderStatus::Transit => "TRANSIT",
            OrderStatus::Delivered => "DELIVERED",
        }
    }

    /// Human readable label shown to customers
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Order Placed",
            OrderStatus::Warehouse => "In the warehouse",
            OrderStatus::Released => "Released to rider",
            OrderStatus::Transit => "On transit",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// Position in the delivery pipeline
    fn stage(&self) -> u8 {
        match self {
            OrderStatus::Placed => 0,
            OrderStatus::Warehouse => 1,
            OrderStatus::Released => 2,
            OrderStatus::Transit => 3,
            OrderStatus::Delivered => 4,
        }
    }

    /// Allowed transitions: staying put or any forward move
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        next.stage() >= self.stage()
    }

    /// Checks a transition and returns the target status when allowed
    pub fn transition_to(&self, next: OrderStatus) -> AppResult<OrderStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition { from: *self, to: next })
        }
    }

    /// Every status reachable from this one
    pub fn next_statuses(&self) -> Vec<OrderStatus> {
        Self::ALL
            .iter()
            .copied()
            .filter(|s| s.stage() > self.stage())
            .collect()
    }

    pub fn is_open(&self) -> bool {
        *self != OrderStatus::Delivered
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Placed
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PLACED" => Ok(OrderStatus::Placed),
            "WAREHOUSE" => Ok(OrderStatus::Warehouse),
            "RELEASED" => Ok(OrderStatus::Released),
            "TRANSIT" => Ok(OrderStatus::Transit),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            other => Err(AppError::BadRequest(format!(
                "'{}' is not a valid order status; expected one of PLACED, WAREHOUSE, RELEASED, TRANSIT, DELIVERED",
                other
            ))),
        }
    }
}

/// Order - maps to the orders table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub tracking_number: Uuid,
    pub payment_ref: String,
    pub payment_complete_status: bool,
    pub order_status: OrderStatus,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>,
    pub rider_id: Option<i64>,
    pub quote_id: i64,
}

/// Values needed to insert an order; the tracking number is generated by the store
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub quote_id: i64,
    pub rider_id: Option<i64>,
    pub payment_ref: String,
    pub payment_complete_status: bool,
}

/// Field changes for an existing order. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub payment_ref: Option<String>,
    pub payment_complete_status: Option<bool>,
    pub order_status: Option<OrderStatus>,
    pub rider_id: Option<i64>,
}

impl OrderChanges {
    pub fn is_empty(&self) -> bool {
        self.payment_ref.is_none()
            && self.payment_complete_status.is_none()
            && self.order_status.is_none()
            && self.rider_id.is_none()
    }

    /// Applies the changes on top of a stored order. The status goes through
    /// the transition table; the rider link is set as given.
    pub fn apply(self, mut order: Order) -> AppResult<Order> {
        if let Some(next) = self.order_status {
            order.order_status = order.order_status.transition_to(next)?;
        }
        if let Some(v) = self.payment_ref {
            order.payment_ref = v;
        }
        if let Some(v) = self.payment_complete_status {
            order.payment_complete_status = v;
        }
        if self.rider_id.is_some() {
            order.rider_id = self.rider_id;
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Warehouse));
        assert!(OrderStatus::Warehouse.can_transition_to(OrderStatus::Released));
        assert!(OrderStatus::Released.can_transition_to(OrderStatus::Transit));
        assert!(OrderStatus::Transit.can_transition_to(OrderStatus::Delivered));
        // skipping ahead is a forward move
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_same_status_is_noop() {
        for status in OrderStatus::ALL {
            assert_eq!(status.transition_to(status).unwrap(), status);
        }
    }

    #[test]
    fn test_backward_transitions_rejected() {
        let err = OrderStatus::Delivered
            .transition_to(OrderStatus::Transit)
            .unwrap_err();
        match err {
            AppError::InvalidTransition { from, to } => {
                assert_eq!(from, OrderStatus::Delivered);
                assert_eq!(to, OrderStatus::Transit);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!OrderStatus::Warehouse.can_transition_to(OrderStatus::Placed));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("PLACED".parse::<OrderStatus>().unwrap(), OrderStatus::Placed);
        assert_eq!("transit".parse::<OrderStatus>().unwrap(), OrderStatus::Transit);
        assert!("LOST".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_next_statuses() {
        assert!(OrderStatus::Delivered.next_statuses().is_empty());
        assert_eq!(
            OrderStatus::Released.next_statuses(),
            vec![OrderStatus::Transit, OrderStatus::Delivered]
        );
        assert!(!OrderStatus::Delivered.is_open());
        assert!(OrderStatus::Transit.is_open());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&OrderStatus::Warehouse).unwrap();
        assert_eq!(json, "\"WAREHOUSE\"");
    }
}
