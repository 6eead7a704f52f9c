use std::sync::Arc;

use uuid::Uuid;

use crate::dto::order_dto::{CreateOrderRequest, OrderResponse, UpdateOrderRequest};
use crate::middleware::access::Requester;
use crate::models::order::{Order, OrderChanges, OrderStatus};
use crate::models::quote::Quote;
use crate::repositories::{InvoiceRepository, OrderRepository, QuoteRepository, RiderRepository};
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct OrderController {
    invoices: Arc<dyn InvoiceRepository>,
    orders: Arc<dyn OrderRepository>,
    quotes: Arc<dyn QuoteRepository>,
    riders: Arc<dyn RiderRepository>,
}

impl OrderController {
    pub fn new(state: &AppState) -> Self {
        Self {
            invoices: state.repositories.invoices.clone(),
            orders: state.repositories.orders.clone(),
            quotes: state.repositories.quotes.clone(),
            riders: state.repositories.riders.clone(),
        }
    }

    async fn quote_of(&self, order: &Order) -> AppResult<Quote> {
        self.quotes
            .find_by_id(order.quote_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Order {} has no quote {}", order.id, order.quote_id)))
    }

    /// Resolves the quote and rider of an order
    async fn respond(&self, order: Order) -> AppResult<OrderResponse> {
        let quote = self.quote_of(&order).await?;
        let rider = match order.rider_id {
            Some(rider_id) => self.riders.find_by_id(rider_id).await?,
            None => None,
        };
        Ok(OrderResponse::new(order, quote, rider))
    }

    async fn respond_all(&self, orders: Vec<Order>) -> AppResult<Vec<OrderResponse>> {
        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            responses.push(self.respond(order).await?);
        }
        Ok(responses)
    }

    /// Rider must exist and not be riding another open order
    async fn ensure_rider_available(&self, rider_id: i64, order_id: Option<i64>) -> AppResult<()> {
        if self.riders.find_by_id(rider_id).await?.is_none() {
            return Err(not_found_error("Rider", rider_id));
        }
        match self.orders.find_by_rider(rider_id).await? {
            Some(holder) if Some(holder.id) != order_id && holder.order_status.is_open() => {
                Err(AppError::Conflict(format!(
                    "Rider {} is already assigned to open order {}",
                    rider_id, holder.id
                )))
            }
            _ => Ok(()),
        }
    }

    /// The payment flag of an invoiced order follows the invoice's amount due
    async fn ensure_payment_flag_matches(&self, id: i64, flag: bool) -> AppResult<()> {
        let invoiced = self
            .invoices
            .find_by_order(id)
            .await?
            .and_then(|invoice| invoice.amounts().payment_complete());
        match invoiced {
            Some(expected) if expected != flag => Err(AppError::Conflict(format!(
                "Order {} payment status is set by its invoice",
                id
            ))),
            _ => Ok(()),
        }
    }

    async fn find(&self, id: i64) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Order", id))
    }

    async fn apply(&self, id: i64, changes: OrderChanges) -> AppResult<OrderResponse> {
        let order = self
            .orders
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Order", id))?;
        self.respond(order).await
    }

    pub async fn create(&self, request: CreateOrderRequest) -> AppResult<OrderResponse> {
        if self.quotes.find_by_id(request.quote_id).await?.is_none() {
            return Err(not_found_error("Quote", request.quote_id));
        }
        if self.orders.find_by_quote(request.quote_id).await?.is_some() {
            return Err(conflict_error("Order", "quote_id", &request.quote_id.to_string()));
        }
        if let Some(rider_id) = request.rider_id {
            self.ensure_rider_available(rider_id, None).await?;
        }

        let order = self.orders.create(request.into()).await?;
        self.respond(order).await
    }

    /// Staff sees every order, a client the orders of its own quotes
    pub async fn list(&self, requester: &Requester) -> AppResult<Vec<OrderResponse>> {
        let orders = if requester.is_staff {
            self.orders.list_all().await?
        } else {
            self.orders.list_by_owner(requester.account_id).await?
        };
        self.respond_all(orders).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<OrderResponse>> {
        let orders = self.orders.list_all().await?;
        self.respond_all(orders).await
    }

    pub async fn get(&self, id: i64, requester: &Requester) -> AppResult<OrderResponse> {
        let order = self.find(id).await?;
        let quote = self.quote_of(&order).await?;
        requester.ensure_owner_or_staff(quote.user_id, "read order")?;
        self.respond(order).await
    }

    pub async fn track(&self, tracking_number: &str, requester: &Requester) -> AppResult<OrderResponse> {
        let parsed = Uuid::parse_str(tracking_number)
            .map_err(|_| AppError::BadRequest(format!("'{}' is not a valid tracking number", tracking_number)))?;
        let order = self
            .orders
            .find_by_tracking_number(parsed)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No order with tracking number '{}'", parsed)))?;
        let quote = self.quote_of(&order).await?;
        requester.ensure_owner_or_staff(quote.user_id, "track order")?;
        self.respond(order).await
    }

    pub async fn update_status(&self, id: i64, status: OrderStatus) -> AppResult<OrderResponse> {
        let response = self
            .apply(
                id,
                OrderChanges {
                    order_status: Some(status),
                    ..Default::default()
                },
            )
            .await?;
        log::info!("🚚 Order {} is now {}", id, response.order_status);
        Ok(response)
    }

    pub async fn attach_rider(&self, id: i64, rider_id: i64) -> AppResult<OrderResponse> {
        self.find(id).await?;
        self.ensure_rider_available(rider_id, Some(id)).await?;
        let response = self
            .apply(
                id,
                OrderChanges {
                    rider_id: Some(rider_id),
                    ..Default::default()
                },
            )
            .await?;
        log::info!("🏍️ Rider {} attached to order {}", rider_id, id);
        Ok(response)
    }

    pub async fn update(&self, id: i64, request: UpdateOrderRequest) -> AppResult<OrderResponse> {
        let changes = OrderChanges::try_from(request)?;
        if changes.rider_id.is_some() || changes.payment_complete_status.is_some() {
            self.find(id).await?;
        }
        if let Some(rider_id) = changes.rider_id {
            self.ensure_rider_available(rider_id, Some(id)).await?;
        }
        if let Some(flag) = changes.payment_complete_status {
            self.ensure_payment_flag_matches(id, flag).await?;
        }
        self.apply(id, changes).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.orders.delete(id).await? {
            return Err(not_found_error("Order", id));
        }
        log::info!("🗑️ Order {} deleted", id);
        Ok(())
    }
}
