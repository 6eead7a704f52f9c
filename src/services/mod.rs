//! Services
//!
//! Token issuing and password hashing. Controllers hold them through the app
//! state; neither touches storage.

pub mod auth_service;
pub mod jwt_service;

pub use auth_service::AuthService;
pub use jwt_service::{JwtConfig, JwtService};
