//! HTTP middleware
//!
//! Bearer token authentication, the capability gate and CORS.

pub mod access;
pub mod auth;
pub mod cors;

pub use access::{require_capability, Capability, Requester};
pub use auth::{authenticate, Authentication};
pub use cors::cors_for;
