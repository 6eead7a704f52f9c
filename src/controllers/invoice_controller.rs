use std::sync::Arc;

use crate::dto::invoice_dto::{CreateInvoiceRequest, InvoiceResponse, UpdateInvoiceRequest};
use crate::middleware::access::Requester;
use crate::models::invoice::{Invoice, NewInvoice};
use crate::repositories::{InvoiceRepository, OrderRepository, QuoteRepository};
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct InvoiceController {
    invoices: Arc<dyn InvoiceRepository>,
    orders: Arc<dyn OrderRepository>,
    quotes: Arc<dyn QuoteRepository>,
}

impl InvoiceController {
    pub fn new(state: &AppState) -> Self {
        Self {
            invoices: state.repositories.invoices.clone(),
            orders: state.repositories.orders.clone(),
            quotes: state.repositories.quotes.clone(),
        }
    }

    async fn respond(&self, invoice: Invoice) -> AppResult<InvoiceResponse> {
        let order = self
            .orders
            .find_by_id(invoice.order_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Invoice {} has no order", invoice.id)))?;
        let quote = self
            .quotes
            .find_by_id(invoice.quote_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Invoice {} has no quote", invoice.id)))?;
        Ok(InvoiceResponse::new(invoice, order, quote))
    }

    async fn respond_all(&self, invoices: Vec<Invoice>) -> AppResult<Vec<InvoiceResponse>> {
        let mut responses = Vec::with_capacity(invoices.len());
        for invoice in invoices {
            responses.push(self.respond(invoice).await?);
        }
        Ok(responses)
    }

    pub async fn create(&self, request: CreateInvoiceRequest) -> AppResult<InvoiceResponse> {
        let order = self
            .orders
            .find_by_id(request.order_id)
            .await?
            .ok_or_else(|| not_found_error("Order", request.order_id))?;
        if self.invoices.find_by_order(order.id).await?.is_some() {
            return Err(conflict_error("Invoice", "order_id", &order.id.to_string()));
        }

        let invoice = self
            .invoices
            .create(NewInvoice {
                order_id: order.id,
                quote_id: order.quote_id,
                amounts: request.amounts(),
            })
            .await?;
        self.respond(invoice).await
    }

    /// Staff sees every invoice, a client the invoices of its own quotes
    pub async fn list(&self, requester: &Requester) -> AppResult<Vec<InvoiceResponse>> {
        let invoices = if requester.is_staff {
            self.invoices.list_all().await?
        } else {
            self.invoices.list_by_owner(requester.account_id).await?
        };
        self.respond_all(invoices).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<InvoiceResponse>> {
        let invoices = self.invoices.list_all().await?;
        self.respond_all(invoices).await
    }

    pub async fn get(&self, id: i64, requester: &Requester) -> AppResult<InvoiceResponse> {
        let invoice = self
            .invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Invoice", id))?;
        let response = self.respond(invoice).await?;
        requester.ensure_owner_or_staff(response.quote.user_id, "read invoice")?;
        Ok(response)
    }

    pub async fn update(&self, id: i64, request: UpdateInvoiceRequest) -> AppResult<InvoiceResponse> {
        let invoice = self
            .invoices
            .update(id, request.into())
            .await?
            .ok_or_else(|| not_found_error("Invoice", id))?;
        log::info!("🧾 Invoice {} amounts updated", id);
        self.respond(invoice).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.invoices.delete(id).await? {
            return Err(not_found_error("Invoice", id));
        }
        log::info!("🗑️ Invoice {} deleted", id);
        Ok(())
    }
}
