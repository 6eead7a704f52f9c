//! Validation helpers
//!
//! Request bodies are deserialized and validated in one step by the
//! [`ValidatedJson`] extractor. Field rules live on the DTOs as `validator`
//! attributes; the shared patterns and custom checks are here.

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use crate::models::order::OrderStatus;
use crate::utils::errors::AppError;

lazy_static! {
    /// E.164-like phone number: optional '+', 9 to 15 digits
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?\d{9,15}$").expect("phone regex");
}

/// JSON body that has passed its `validator` rules
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Treats a missing, null or blank string as `None`
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Rejects anything that is not one of the five order statuses
pub fn validate_order_status(value: &str) -> Result<(), ValidationError> {
    value.parse::<OrderStatus>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("order_status");
        error.message = Some("Must be one of PLACED, WAREHOUSE, RELEASED, TRANSIT, DELIVERED".into());
        error
    })
}

/// Rejects strings made only of whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("This field may not be blank".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Contact {
        #[serde(default, deserialize_with = "empty_as_none")]
        email: Option<String>,
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+254712345678"));
        assert!(PHONE_REGEX.is_match("0712345678"));
        assert!(!PHONE_REGEX.is_match("12345"));
        assert!(!PHONE_REGEX.is_match("07123-45678"));
    }

    #[test]
    fn test_empty_as_none() {
        let c: Contact = serde_json::from_str(r#"{"email": "  "}"#).unwrap();
        assert_eq!(c.email, None);
        let c: Contact = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(c.email, None);
        let c: Contact = serde_json::from_str(r#"{"email": "a@b.io"}"#).unwrap();
        assert_eq!(c.email.as_deref(), Some("a@b.io"));
    }

    #[test]
    fn test_validate_order_status() {
        assert!(validate_order_status("TRANSIT").is_ok());
        assert!(validate_order_status("LOST").is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Laptop").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }
}
