//! In-memory storage backend.
//!
//! Implements every repository trait over plain maps behind one lock, so a
//! multi-table mutation is atomic for free. Used by the test suite and by
//! `STORAGE_BACKEND=memory` for local runs; nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::account::{Account, NewAccount};
use crate::models::invoice::{Invoice, InvoiceAmounts, NewInvoice};
use crate::models::order::{NewOrder, Order, OrderChanges, OrderStatus};
use crate::models::quote::{NewQuote, Quote, QuoteChanges};
use crate::models::rider::{NewRider, Rider, RiderChanges};
use crate::utils::errors::{AppError, AppResult};

use super::{AccountRepository, InvoiceRepository, OrderRepository, QuoteRepository, RiderRepository};

#[derive(Default)]
struct Tables {
    next_id: i64,
    accounts: BTreeMap<i64, Account>,
    quotes: BTreeMap<i64, Quote>,
    riders: BTreeMap<i64, Rider>,
    orders: BTreeMap<i64, Order>,
    invoices: BTreeMap<i64, Invoice>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Same rules as the Postgres `free_rider` helper
    fn free_rider(&mut self, rider_id: i64, order_id: Option<i64>) -> AppResult<()> {
        let holder = self
            .orders
            .values()
            .find(|o| o.rider_id == Some(rider_id))
            .map(|o| (o.id, o.order_status));

        match holder {
            Some((holder_id, _)) if Some(holder_id) == order_id => Ok(()),
            Some((holder_id, status)) if status.is_open() => Err(AppError::Conflict(format!(
                "Rider {} is already assigned to open order {}",
                rider_id, holder_id
            ))),
            Some((holder_id, _)) => {
                if let Some(order) = self.orders.get_mut(&holder_id) {
                    order.rider_id = None;
                    order.updated_ts = Utc::now();
                }
                log::info!("🏍️ Rider {} released from delivered order {}", rider_id, holder_id);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn sync_payment_flag(&mut self, order_id: i64, amounts: &InvoiceAmounts) {
        if let Some(complete) = amounts.payment_complete() {
            if let Some(order) = self.orders.get_mut(&order_id) {
                order.payment_complete_status = complete;
                order.updated_ts = Utc::now();
            }
        }
    }

    fn rider_phone_taken(&self, phone: &str, except: Option<i64>) -> bool {
        self.riders
            .values()
            .any(|r| Some(r.id) != except && r.rider_phone.as_deref() == Some(phone))
    }
}

/// Newest first, like the SQL listings
fn newest_first<T: Clone>(rows: impl Iterator<Item = T>) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.reverse();
    rows
}

pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        let mut tables = self.tables.write().await;

        let taken = tables.accounts.values().any(|a| {
            a.username == account.username
                || matches!((&a.email, &account.email), (Some(x), Some(y)) if x.eq_ignore_ascii_case(y))
                || matches!((&a.phone, &account.phone), (Some(x), Some(y)) if x == y)
        });
        if taken {
            return Err(AppError::Conflict(
                "Username, email or phone is already taken".to_string(),
            ));
        }

        let id = tables.next_id();
        let created = Account {
            id,
            username: account.username,
            password_hash: account.password_hash,
            email: account.email,
            phone: account.phone,
            first_name: account.first_name,
            last_name: account.last_name,
            bio: account.bio,
            location: account.location,
            is_staff: account.is_staff,
            is_active: true,
            date_joined: Utc::now(),
        };
        tables.accounts.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.username == username).cloned())
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .any(|a| a.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email))))
    }

    async fn phone_exists(&self, phone: &str) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().any(|a| a.phone.as_deref() == Some(phone)))
    }

    async fn set_staff(&self, id: i64, is_staff: bool) -> AppResult<Option<Account>> {
        let mut tables = self.tables.write().await;
        Ok(tables.accounts.get_mut(&id).map(|a| {
            a.is_staff = is_staff;
            a.clone()
        }))
    }
}

#[async_trait]
impl QuoteRepository for MemoryStore {
    async fn create(&self, owner_id: i64, quote: NewQuote) -> AppResult<Quote> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&owner_id) {
            return Err(AppError::NotFound(format!("Account with id {} not found", owner_id)));
        }

        let id = tables.next_id();
        let now = Utc::now();
        let created = Quote {
            id,
            item_name: quote.item_name,
            item_description: quote.item_description,
            location_from: quote.location_from,
            location_to: quote.location_to,
            estimated_delivery: quote.estimated_delivery,
            estimated_cost: quote.estimated_cost,
            client_review_status: false,
            created_ts: now,
            updated_ts: now,
            user_id: owner_id,
        };
        tables.quotes.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quote>> {
        Ok(self.tables.read().await.quotes.get(&id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Quote>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.quotes.values().cloned()))
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Quote>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.quotes.values().filter(|q| q.user_id == owner_id).cloned(),
        ))
    }

    async fn update(&self, id: i64, changes: QuoteChanges) -> AppResult<Option<Quote>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.quotes.get(&id).cloned() else {
            return Ok(None);
        };
        let mut updated = changes.apply(current);
        updated.updated_ts = Utc::now();
        tables.quotes.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.quotes.remove(&id).is_none() {
            return Ok(false);
        }
        tables.orders.retain(|_, o| o.quote_id != id);
        tables.invoices.retain(|_, i| i.quote_id != id);
        Ok(true)
    }
}

#[async_trait]
impl RiderRepository for MemoryStore {
    async fn create(&self, rider: NewRider) -> AppResult<Rider> {
        let mut tables = self.tables.write().await;
        if let Some(phone) = rider.rider_phone.as_deref() {
            if tables.rider_phone_taken(phone, None) {
                return Err(AppError::Conflict("Rider phone is already registered".to_string()));
            }
        }

        let id = tables.next_id();
        let now = Utc::now();
        let created = Rider {
            id,
            rider_name: rider.rider_name,
            rider_motor: rider.rider_motor,
            rider_phone: rider.rider_phone,
            created_ts: now,
            updated_ts: now,
        };
        tables.riders.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Rider>> {
        Ok(self.tables.read().await.riders.get(&id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Rider>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.riders.values().cloned()))
    }

    async fn update(&self, id: i64, changes: RiderChanges) -> AppResult<Option<Rider>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.riders.get(&id).cloned() else {
            return Ok(None);
        };
        if let Some(phone) = changes.rider_phone.as_deref() {
            if tables.rider_phone_taken(phone, Some(id)) {
                return Err(AppError::Conflict("Rider phone is already registered".to_string()));
            }
        }
        let mut updated = changes.apply(current);
        updated.updated_ts = Utc::now();
        tables.riders.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.riders.remove(&id).is_none() {
            return Ok(false);
        }
        for order in tables.orders.values_mut().filter(|o| o.rider_id == Some(id)) {
            order.rider_id = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        let mut tables = self.tables.write().await;

        if !tables.quotes.contains_key(&order.quote_id) {
            return Err(AppError::NotFound(format!("Quote with id {} not found", order.quote_id)));
        }
        if let Some(existing) = tables.orders.values().find(|o| o.quote_id == order.quote_id) {
            return Err(AppError::Conflict(format!(
                "Quote {} already has order {}",
                order.quote_id, existing.id
            )));
        }
        if let Some(rider_id) = order.rider_id {
            if !tables.riders.contains_key(&rider_id) {
                return Err(AppError::NotFound(format!("Rider with id {} not found", rider_id)));
            }
            tables.free_rider(rider_id, None)?;
        }

        let id = tables.next_id();
        let now = Utc::now();
        let created = Order {
            id,
            tracking_number: Uuid::new_v4(),
            payment_ref: order.payment_ref,
            payment_complete_status: order.payment_complete_status,
            order_status: OrderStatus::Placed,
            created_ts: now,
            updated_ts: now,
            rider_id: order.rider_id,
            quote_id: order.quote_id,
        };
        tables.orders.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn find_by_tracking_number(&self, tracking_number: Uuid) -> AppResult<Option<Order>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .find(|o| o.tracking_number == tracking_number)
            .cloned())
    }

    async fn find_by_quote(&self, quote_id: i64) -> AppResult<Option<Order>> {
        let tables = self.tables.read().await;
        Ok(tables.orders.values().find(|o| o.quote_id == quote_id).cloned())
    }

    async fn find_by_rider(&self, rider_id: i64) -> AppResult<Option<Order>> {
        let tables = self.tables.read().await;
        Ok(tables.orders.values().find(|o| o.rider_id == Some(rider_id)).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.orders.values().cloned()))
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.orders.values().filter(|o| {
            tables
                .quotes
                .get(&o.quote_id)
                .is_some_and(|q| q.user_id == owner_id)
        }).cloned()))
    }

    async fn update(&self, id: i64, changes: OrderChanges) -> AppResult<Option<Order>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.orders.get(&id).cloned() else {
            return Ok(None);
        };

        // validate the whole change before touching another row
        let mut updated = changes.clone().apply(current.clone())?;
        if let Some(rider_id) = changes.rider_id {
            if current.rider_id != Some(rider_id) {
                if !tables.riders.contains_key(&rider_id) {
                    return Err(AppError::NotFound(format!("Rider with id {} not found", rider_id)));
                }
                tables.free_rider(rider_id, Some(id))?;
            }
        }

        updated.updated_ts = Utc::now();
        tables.orders.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.orders.remove(&id).is_none() {
            return Ok(false);
        }
        tables.invoices.retain(|_, i| i.order_id != id);
        Ok(true)
    }
}

#[async_trait]
impl InvoiceRepository for MemoryStore {
    async fn create(&self, invoice: NewInvoice) -> AppResult<Invoice> {
        invoice.amounts.check()?;

        let mut tables = self.tables.write().await;
        if !tables.orders.contains_key(&invoice.order_id) {
            return Err(AppError::NotFound(format!("Order with id {} not found", invoice.order_id)));
        }
        if let Some(existing) = tables.invoices.values().find(|i| i.order_id == invoice.order_id) {
            return Err(AppError::Conflict(format!(
                "Order {} already has invoice {}",
                invoice.order_id, existing.id
            )));
        }

        let id = tables.next_id();
        let now = Utc::now();
        let created = Invoice {
            id,
            total_amount: invoice.amounts.total_amount,
            amount_paid: invoice.amounts.amount_paid,
            amount_due: invoice.amounts.amount_due,
            created_ts: now,
            updated_ts: now,
            order_id: invoice.order_id,
            quote_id: invoice.quote_id,
        };
        tables.invoices.insert(id, created.clone());
        tables.sync_payment_flag(invoice.order_id, &invoice.amounts);
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Invoice>> {
        Ok(self.tables.read().await.invoices.get(&id).cloned())
    }

    async fn find_by_order(&self, order_id: i64) -> AppResult<Option<Invoice>> {
        let tables = self.tables.read().await;
        Ok(tables.invoices.values().find(|i| i.order_id == order_id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Invoice>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.invoices.values().cloned()))
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Invoice>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.invoices.values().filter(|i| {
            tables
                .quotes
                .get(&i.quote_id)
                .is_some_and(|q| q.user_id == owner_id)
        }).cloned()))
    }

    async fn update(&self, id: i64, changes: InvoiceAmounts) -> AppResult<Option<Invoice>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.invoices.get(&id).cloned() else {
            return Ok(None);
        };

        let merged = current.amounts().merge(changes);
        merged.check()?;

        let updated = Invoice {
            total_amount: merged.total_amount,
            amount_paid: merged.amount_paid,
            amount_due: merged.amount_due,
            updated_ts: Utc::now(),
            ..current
        };
        tables.invoices.insert(id, updated.clone());
        tables.sync_payment_flag(updated.order_id, &merged);
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.invoices.remove(&id).is_some())
    }
}
