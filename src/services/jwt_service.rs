use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::models::account::Account;
use crate::models::auth::{JwtClaims, TokenPair, TokenType};
use crate::utils::errors::{AppError, AppResult};

/// JWT settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_duration: Duration,
    pub refresh_token_duration: Duration,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::seconds(config.access_token_ttl_secs),
            refresh_token_duration: Duration::seconds(config.refresh_token_ttl_secs),
        }
    }
}

/// Issues and checks access/refresh tokens
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn issue(&self, account: &Account, token_type: TokenType) -> AppResult<String> {
        let now = Utc::now();
        let lifetime = match token_type {
            TokenType::Access => self.config.access_token_duration,
            TokenType::Refresh => self.config.refresh_token_duration,
        };

        let claims = JwtClaims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            is_staff: account.is_staff,
            token_type,
            jti: Uuid::new_v4().to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Jwt(format!("Error generating {} token: {}", token_type.as_str(), e)))
    }

    pub fn generate_access_token(&self, account: &Account) -> AppResult<String> {
        self.issue(account, TokenType::Access)
    }

    pub fn generate_refresh_token(&self, account: &Account) -> AppResult<String> {
        self.issue(account, TokenType::Refresh)
    }

    pub fn generate_pair(&self, account: &Account) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_access_token(account)?,
            refresh_token: self.generate_refresh_token(account)?,
        })
    }

    /// Decodes a token and checks signature, expiry and kind
    pub fn validate_token(&self, token: &str, expected: TokenType) -> AppResult<JwtClaims> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.leeway = 0;

        let claims = decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))?;

        if claims.token_type != expected {
            return Err(AppError::Jwt(format!(
                "Expected an {} token, got a {} token",
                expected.as_str(),
                claims.token_type.as_str()
            )));
        }

        Ok(claims)
    }

    /// Mints a new access token from a valid refresh token. The account is
    /// re-read by the caller so a revoked staff flag does not survive a refresh.
    pub fn refresh_access_token(&self, refresh_token: &str, account: &Account) -> AppResult<String> {
        let claims = self.validate_token(refresh_token, TokenType::Refresh)?;
        if claims.account_id() != Some(account.id) {
            return Err(AppError::Jwt("Refresh token does not belong to this account".to_string()));
        }
        self.generate_access_token(account)
    }
}
