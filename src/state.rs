//! Shared application state
//!
//! Everything handlers need travels through [`AppState`]: configuration,
//! the repository bundle and the token/password services.

use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::repositories::Repositories;
use crate::services::auth_service::AuthService;
use crate::services::jwt_service::{JwtConfig, JwtService};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub repositories: Repositories,
    pub jwt: Arc<JwtService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, repositories: Repositories) -> AppResult<Self> {
        let jwt = JwtService::new(JwtConfig::from(&config));
        let auth = AuthService::new(config.bcrypt_cost)?;

        Ok(Self {
            config: Arc::new(config),
            repositories,
            jwt: Arc::new(jwt),
            auth: Arc::new(auth),
        })
    }
}
