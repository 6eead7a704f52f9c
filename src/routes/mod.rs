//! HTTP routes
//!
//! Each resource owns a router; [`create_api_router`] merges them. Handlers
//! are thin: extract, call the controller, wrap the result.

pub mod auth_routes;
pub mod health_routes;
pub mod invoice_routes;
pub mod order_routes;
pub mod quote_routes;
pub mod rider_routes;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    middleware,
    routing::MethodRouter,
    Router,
};

use crate::middleware::access::{require_capability, Capability};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Puts a method router behind the capability gate
pub(crate) fn guarded(capability: Capability, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(capability, require_capability))
}

/// Numeric `:id` path segment; a malformed id is a 400 with the usual error body
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(IdPath(id))
    }
}

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes::health_routes())
        .merge(auth_routes::auth_routes())
        .merge(quote_routes::quote_routes())
        .merge(order_routes::order_routes())
        .merge(invoice_routes::invoice_routes())
        .merge(rider_routes::rider_routes())
}
