//! Delivery logistics backend
//!
//! Clients request shipping quotes, staff turn them into orders, attach
//! riders, move the delivery status forward and bill through invoices. The
//! `relay` binary is a thin session-holding front end over the same API.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod relay;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::{authenticate, cors_for};
use crate::state::AppState;

/// Builds the API router with authentication, CORS and request tracing
pub fn create_app(state: AppState) -> Router {
    routes::create_api_router()
        .layer(axum_middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(cors_for(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
