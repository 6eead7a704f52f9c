use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::account::{Account, NewAccount};
use crate::utils::errors::{map_unique_violation, AppError, AppResult};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts an account; a taken username, email or phone is a conflict
    async fn create(&self, account: NewAccount) -> AppResult<Account>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;
    async fn email_exists(&self, email: &str) -> AppResult<bool>;
    async fn phone_exists(&self, phone: &str) -> AppResult<bool>;
    /// Grants or revokes the staff flag
    async fn set_staff(&self, id: i64, is_staff: bool) -> AppResult<Option<Account>>;
}

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        let created = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (username, password_hash, email, phone, first_name, last_name, bio, location, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.bio)
        .bind(&account.location)
        .bind(account.is_staff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Username, email or phone is already taken"))?;

        log::info!("👤 Account '{}' created with id {}", created.username, created.id);
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(result.0)
    }

    async fn phone_exists(&self, phone: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE phone = $1)")
            .bind(phone)
            .fetch_one(&self.pool)
            .await?;
        Ok(result.0)
    }

    async fn set_staff(&self, id: i64, is_staff: bool) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET is_staff = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_staff)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(account)
    }
}
