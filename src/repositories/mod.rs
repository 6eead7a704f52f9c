//! Repositories
//!
//! One trait per table. Each trait has a PostgreSQL implementation next to it
//! and the in-memory [`memory::MemoryStore`] implements all of them, so the
//! controllers never know which backend they talk to.
//!
//! Multi-row mutations (order creation with a rider, rider hand-over, invoice
//! amounts together with the order payment flag, cascading deletes) are atomic
//! inside each implementation.

pub mod account_repository;
pub mod invoice_repository;
pub mod memory;
pub mod order_repository;
pub mod quote_repository;
pub mod rider_repository;

use std::sync::Arc;

use sqlx::PgPool;

pub use account_repository::{AccountRepository, PgAccountRepository};
pub use invoice_repository::{InvoiceRepository, PgInvoiceRepository};
pub use memory::MemoryStore;
pub use order_repository::{OrderRepository, PgOrderRepository};
pub use quote_repository::{PgQuoteRepository, QuoteRepository};
pub use rider_repository::{PgRiderRepository, RiderRepository};

/// Bundle of repositories handed to the controllers
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub quotes: Arc<dyn QuoteRepository>,
    pub riders: Arc<dyn RiderRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
}

impl Repositories {
    /// Repositories backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            accounts: Arc::new(PgAccountRepository::new(pool.clone())),
            quotes: Arc::new(PgQuoteRepository::new(pool.clone())),
            riders: Arc::new(PgRiderRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
            invoices: Arc::new(PgInvoiceRepository::new(pool)),
        }
    }

    /// Repositories backed by one shared in-memory store
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            accounts: store.clone(),
            quotes: store.clone(),
            riders: store.clone(),
            orders: store.clone(),
            invoices: store,
        }
    }
}
