use std::sync::Arc;

use crate::dto::auth_dto::{
    AccountResponse, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
};
use crate::middleware::access::Requester;
use crate::models::account::{Account, NewAccount};
use crate::models::auth::TokenType;
use crate::repositories::AccountRepository;
use crate::services::auth_service::AuthService;
use crate::services::jwt_service::JwtService;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

const INVALID_CREDENTIALS: &str = "Username or Password is invalid!";

pub struct AccountController {
    accounts: Arc<dyn AccountRepository>,
    jwt: Arc<JwtService>,
    auth: Arc<AuthService>,
}

impl AccountController {
    pub fn new(state: &AppState) -> Self {
        Self {
            accounts: state.repositories.accounts.clone(),
            jwt: state.jwt.clone(),
            auth: state.auth.clone(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AccountResponse> {
        let username = request.username.trim().to_string();

        if self.accounts.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("Username is already taken!".to_string()));
        }
        if let Some(email) = request.email.as_deref() {
            if self.accounts.email_exists(email).await? {
                return Err(AppError::Conflict("Email is already registered".to_string()));
            }
        }
        if let Some(phone) = request.phone.as_deref() {
            if self.accounts.phone_exists(phone).await? {
                return Err(AppError::Conflict("Phone number is already registered".to_string()));
            }
        }

        let password_hash = self.auth.hash_password(&request.password).await?;
        let account = self
            .accounts
            .create(NewAccount {
                username,
                password_hash,
                email: request.email,
                phone: request.phone,
                first_name: request.first_name,
                last_name: request.last_name,
                bio: request.bio,
                location: request.location,
                is_staff: false,
            })
            .await?;

        Ok(account.into())
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let username = request.username.trim();
        let account = self.accounts.find_by_username(username).await?;

        let verified = self
            .auth
            .verify_password(
                &request.password,
                account.as_ref().map(|a| a.password_hash.as_str()),
            )
            .await?;

        let account = match account {
            Some(account) if verified && account.is_active => account,
            _ => {
                log::warn!("🔒 Failed login for '{}'", username);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        let authentication = self.jwt.generate_pair(&account)?;
        log::info!("🔑 Account {} logged in", account.id);

        Ok(LoginResponse {
            success: true,
            authentication,
            user: account.into(),
        })
    }

    pub async fn refresh(&self, request: RefreshRequest) -> AppResult<RefreshResponse> {
        let claims = self
            .jwt
            .validate_token(&request.refresh, TokenType::Refresh)
            .map_err(|e| AppError::Unauthorized(format!("Token is invalid or expired: {}", e)))?;

        let account = match claims.account_id() {
            Some(id) => self.accounts.find_by_id(id).await?,
            None => None,
        };
        let account = account
            .filter(|a| a.is_active)
            .ok_or_else(|| AppError::Unauthorized("Account is unknown or inactive".to_string()))?;

        let access = self
            .jwt
            .refresh_access_token(&request.refresh, &account)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        Ok(RefreshResponse { access })
    }

    pub async fn me(&self, requester: &Requester) -> AppResult<AccountResponse> {
        self.accounts
            .find_by_id(requester.account_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))
    }

    /// Creates the configured staff account, or promotes it if it already exists
    pub async fn ensure_staff_account(&self, username: &str, password: &str) -> AppResult<Account> {
        if let Some(existing) = self.accounts.find_by_username(username).await? {
            if existing.is_staff {
                log::info!("👮 Staff account '{}' already present", username);
                return Ok(existing);
            }
            log::info!("👮 Promoting '{}' to staff", username);
            return self
                .accounts
                .set_staff(existing.id, true)
                .await?
                .ok_or_else(|| AppError::Internal(format!("Account '{}' vanished during promotion", username)));
        }

        let password_hash = self.auth.hash_password(password).await?;
        let account = self
            .accounts
            .create(NewAccount {
                username: username.to_string(),
                password_hash,
                email: None,
                phone: None,
                first_name: String::new(),
                last_name: String::new(),
                bio: String::new(),
                location: String::new(),
                is_staff: true,
            })
            .await?;

        log::info!("👮 Staff account '{}' created", username);
        Ok(account)
    }
}
