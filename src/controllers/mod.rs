//! Controllers
//!
//! Business operations behind the HTTP handlers. Each controller borrows the
//! repositories it needs from the app state.

pub mod account_controller;
pub mod invoice_controller;
pub mod order_controller;
pub mod quote_controller;
pub mod rider_controller;
