use serde::{Deserialize, Serialize};

/// Kind of bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // account id
    pub username: String,
    pub is_staff: bool,
    pub token_type: TokenType,
    pub jti: String,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

impl JwtClaims {
    pub fn account_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Access + refresh pair handed out at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
