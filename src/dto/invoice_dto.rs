use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::quote_dto::QuoteResponse;
use crate::models::invoice::{Invoice, InvoiceAmounts};
use crate::models::order::Order;
use crate::models::quote::Quote;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    pub order_id: i64,
    #[validate(range(min = 0))]
    pub total_amount: Option<i64>,
    #[validate(range(min = 0))]
    pub amount_paid: Option<i64>,
    #[validate(range(min = 0))]
    pub amount_due: Option<i64>,
}

impl CreateInvoiceRequest {
    pub fn amounts(&self) -> InvoiceAmounts {
        InvoiceAmounts {
            total_amount: self.total_amount,
            amount_paid: self.amount_paid,
            amount_due: self.amount_due,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
    #[validate(range(min = 0))]
    pub total_amount: Option<i64>,
    #[validate(range(min = 0))]
    pub amount_paid: Option<i64>,
    #[validate(range(min = 0))]
    pub amount_due: Option<i64>,
}

impl From<UpdateInvoiceRequest> for InvoiceAmounts {
    fn from(request: UpdateInvoiceRequest) -> Self {
        Self {
            total_amount: request.total_amount,
            amount_paid: request.amount_paid,
            amount_due: request.amount_due,
        }
    }
}

/// Invoice with its order and quote resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub id: i64,
    pub total_amount: Option<i64>,
    pub amount_paid: Option<i64>,
    pub amount_due: Option<i64>,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>,
    pub order: Order,
    pub quote: QuoteResponse,
}

impl InvoiceResponse {
    pub fn new(invoice: Invoice, order: Order, quote: Quote) -> Self {
        Self {
            id: invoice.id,
            total_amount: invoice.total_amount,
            amount_paid: invoice.amount_paid,
            amount_due: invoice.amount_due,
            created_ts: invoice.created_ts,
            updated_ts: invoice.updated_ts,
            order,
            quote: quote.into(),
        }
    }
}
