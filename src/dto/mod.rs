//! Request and response bodies

pub mod auth_dto;
pub mod common;
pub mod invoice_dto;
pub mod order_dto;
pub mod quote_dto;
pub mod rider_dto;

pub use common::{ApiResponse, MessageResponse};
