//! Shared utilities
//!
//! Error type and request validation helpers.

pub mod errors;
pub mod validation;

pub use errors::{AppError, AppResult};
pub use validation::ValidatedJson;
