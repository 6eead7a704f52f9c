use bcrypt::{hash, verify};

use crate::utils::errors::{AppError, AppResult};

/// Password hashing with bcrypt
pub struct AuthService {
    cost: u32,
    // verified against when the username is unknown, so both paths cost the same
    dummy_hash: String,
}

impl AuthService {
    pub fn new(cost: u32) -> AppResult<Self> {
        let dummy_hash = hash("not-a-real-password", cost)
            .map_err(|e| AppError::Hash(format!("Error preparing dummy hash: {}", e)))?;
        Ok(Self { cost, dummy_hash })
    }

    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))
    }

    /// Checks a password against a stored hash, or against the dummy hash
    /// when there is no account
    pub async fn verify_password(&self, password: &str, stored: Option<&str>) -> AppResult<bool> {
        let password = password.to_string();
        let known = stored.is_some();
        let target = stored.unwrap_or(&self.dummy_hash).to_string();

        let matched = tokio::task::spawn_blocking(move || verify(password, &target))
            .await
            .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        Ok(known && matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let auth = AuthService::new(4).unwrap();
        let hashed = auth.hash_password("s3cret-pass").await.unwrap();
        assert_ne!(hashed, "s3cret-pass");
        assert!(auth.verify_password("s3cret-pass", Some(&hashed)).await.unwrap());
        assert!(!auth.verify_password("wrong-pass", Some(&hashed)).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_account_never_matches() {
        let auth = AuthService::new(4).unwrap();
        assert!(!auth.verify_password("not-a-real-password", None).await.unwrap());
    }
}
