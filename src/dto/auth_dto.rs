use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::account::Account;
use crate::models::auth::TokenPair;
use crate::utils::validation::{empty_as_none, validate_not_blank};

// Registration
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 32), custom = "validate_not_blank")]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(regex(path = "crate::utils::validation::PHONE_REGEX", message = "Phone number must be 9 to 15 digits, optionally prefixed with '+'"))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub location: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub authentication: TokenPair,
    pub user: AccountResponse,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub location: String,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            phone: account.phone,
            first_name: account.first_name,
            last_name: account.last_name,
            bio: account.bio,
            location: account.location,
            is_staff: account.is_staff,
            date_joined: account.date_joined,
        }
    }
}
