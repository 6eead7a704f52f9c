//! Bearer token authentication
//!
//! Runs on every request. A valid access token for an active account puts an
//! [`Authentication::Authenticated`] into the request extensions; anything
//! else records why it was rejected. Public routes ignore the outcome, the
//! capability gate in [`super::access`] turns a rejection into a 401.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::middleware::access::Requester;
use crate::models::auth::TokenType;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Outcome of reading the Authorization header
#[derive(Debug, Clone)]
pub enum Authentication {
    Authenticated(Requester),
    Rejected(String),
}

/// Extracts the token from an `Authorization: Bearer <token>` header value
pub fn extract_bearer(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn resolve(state: &AppState, token: &str) -> Result<Requester, String> {
    let claims = state
        .jwt
        .validate_token(token, TokenType::Access)
        .map_err(|e| e.to_string())?;

    let account_id = claims
        .account_id()
        .ok_or_else(|| "Token subject is not an account id".to_string())?;

    let account = state
        .repositories
        .accounts
        .find_by_id(account_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "Account no longer exists".to_string())?;

    if !account.is_active {
        return Err("Account is inactive".to_string());
    }

    Ok(Requester::from(&account))
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let outcome = match header_value {
        None => Authentication::Rejected("Authentication credentials were not provided".to_string()),
        Some(value) => match extract_bearer(&value) {
            None => Authentication::Rejected("Authorization header must be 'Bearer <token>'".to_string()),
            Some(token) => match resolve(&state, token).await {
                Ok(requester) => {
                    log::debug!("🔐 Authenticated account {} ({})", requester.account_id, requester.username);
                    Authentication::Authenticated(requester)
                }
                Err(reason) => {
                    log::warn!("🔒 Rejected bearer token: {}", reason);
                    Authentication::Rejected(reason)
                }
            },
        },
    };

    request.extensions_mut().insert(outcome);
    Ok(next.run(request).await)
}
