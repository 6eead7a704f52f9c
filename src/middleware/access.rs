//! Access gate
//!
//! Routes declare the capability they need with
//! `route_layer(from_fn_with_state(Capability::X, require_capability))`.
//! Handlers then take a [`Requester`] argument and apply the
//! owner-or-staff check themselves where a resource has an owner.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::middleware::auth::Authentication;
use crate::models::account::Account;
use crate::utils::errors::{forbidden_error, AppError};

/// Identity of the caller, taken from a validated access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub account_id: i64,
    pub username: String,
    pub is_staff: bool,
}

impl From<&Account> for Requester {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            username: account.username.clone(),
            is_staff: account.is_staff,
        }
    }
}

impl Requester {
    pub fn owns_or_staff(&self, owner_id: i64) -> bool {
        self.is_staff || self.account_id == owner_id
    }

    pub fn ensure_owner_or_staff(&self, owner_id: i64, operation: &str) -> Result<(), AppError> {
        if self.owns_or_staff(owner_id) {
            Ok(())
        } else {
            Err(forbidden_error(
                operation,
                "you do not have permission to perform this action",
            ))
        }
    }
}

/// What a route requires from its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    AuthenticatedClient,
    AuthenticatedStaff,
    AuthenticatedClientOrStaff,
}

impl Capability {
    pub fn permits(&self, requester: &Requester) -> bool {
        match self {
            Capability::AuthenticatedClient | Capability::AuthenticatedClientOrStaff => true,
            Capability::AuthenticatedStaff => requester.is_staff,
        }
    }
}

fn requester_from(authentication: Option<&Authentication>) -> Result<Requester, AppError> {
    match authentication {
        Some(Authentication::Authenticated(requester)) => Ok(requester.clone()),
        Some(Authentication::Rejected(reason)) => Err(AppError::Unauthorized(reason.clone())),
        None => Err(AppError::Unauthorized(
            "Authentication credentials were not provided".to_string(),
        )),
    }
}

pub async fn require_capability(
    State(capability): State<Capability>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let requester = requester_from(request.extensions().get::<Authentication>())?;

    if !capability.permits(&requester) {
        log::warn!(
            "⛔ Account {} lacks {:?} for {} {}",
            requester.account_id,
            capability,
            request.method(),
            request.uri().path()
        );
        return Err(AppError::Forbidden(
            "You do not have permission to perform this action".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        requester_from(parts.extensions.get::<Authentication>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requester(is_staff: bool) -> Requester {
        Requester {
            account_id: 1,
            username: "alice".to_string(),
            is_staff,
        }
    }

    #[test]
    fn test_capabilities() {
        let client = requester(false);
        let staff = requester(true);

        assert!(Capability::AuthenticatedClient.permits(&client));
        assert!(Capability::AuthenticatedClient.permits(&staff));
        assert!(Capability::AuthenticatedClientOrStaff.permits(&client));
        assert!(!Capability::AuthenticatedStaff.permits(&client));
        assert!(Capability::AuthenticatedStaff.permits(&staff));
    }

    #[test]
    fn test_owner_or_staff() {
        let client = requester(false);
        assert!(client.owns_or_staff(1));
        assert!(!client.owns_or_staff(2));
        assert!(requester(true).owns_or_staff(2));
        assert!(matches!(
            client.ensure_owner_or_staff(2, "read quote"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_missing_authentication_is_unauthorized() {
        assert!(matches!(requester_from(None), Err(AppError::Unauthorized(_))));
        let rejected = Authentication::Rejected("expired".to_string());
        assert!(matches!(
            requester_from(Some(&rejected)),
            Err(AppError::Unauthorized(msg)) if msg == "expired"
        ));
    }
}
