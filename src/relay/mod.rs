//! Front-end relay
//!
//! Holds browser sessions and forwards calls to the delivery API with the
//! session's bearer token, refreshing it before every call.

pub mod client;
pub mod routes;
pub mod session;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::relay::RelayConfig;
use crate::utils::errors::AppResult;

use client::ApiClient;
use session::SessionStore;

#[derive(Clone)]
pub struct RelayState {
    pub config: Arc<RelayConfig>,
    pub client: Arc<ApiClient>,
    pub sessions: SessionStore,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> AppResult<Self> {
        let client = ApiClient::new(config.api_url.clone())?;
        let sessions = SessionStore::new(config.session_ttl_secs);
        Ok(Self {
            config: Arc::new(config),
            client: Arc::new(client),
            sessions,
        })
    }
}

pub fn create_relay_app(state: RelayState) -> Router {
    routes::relay_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
