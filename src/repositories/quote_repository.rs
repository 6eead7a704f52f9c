use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::quote::{NewQuote, Quote, QuoteChanges};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create(&self, owner_id: i64, quote: NewQuote) -> AppResult<Quote>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quote>>;
    async fn list_all(&self) -> AppResult<Vec<Quote>>;
    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Quote>>;
    async fn update(&self, id: i64, changes: QuoteChanges) -> AppResult<Option<Quote>>;
    /// Removes the quote together with its order and invoice
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

pub struct PgQuoteRepository {
    pool: PgPool,
}

impl PgQuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRepository for PgQuoteRepository {
    async fn create(&self, owner_id: i64, quote: NewQuote) -> AppResult<Quote> {
        let created = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (item_name, item_description, location_from, location_to,
                                estimated_delivery, estimated_cost, client_review_status, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
            RETURNING *
            "#,
        )
        .bind(quote.item_name)
        .bind(quote.item_description)
        .bind(quote.location_from)
        .bind(quote.location_to)
        .bind(quote.estimated_delivery)
        .bind(quote.estimated_cost)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        log::info!("📝 Quote {} submitted by account {}", created.id, owner_id);
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quote>> {
        let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(quote)
    }

    async fn list_all(&self) -> AppResult<Vec<Quote>> {
        let quotes = sqlx::query_as::<_, Quote>("SELECT * FROM quotes ORDER BY created_ts DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(quotes)
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Quote>> {
        let quotes = sqlx::query_as::<_, Quote>(
            "SELECT * FROM quotes WHERE user_id = $1 ORDER BY created_ts DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(quotes)
    }

    async fn update(&self, id: i64, changes: QuoteChanges) -> AppResult<Option<Quote>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };
        let merged = changes.apply(current);

        let updated = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET item_name = $2, item_description = $3, location_from = $4, location_to = $5,
                estimated_delivery = $6, estimated_cost = $7, client_review_status = $8,
                updated_ts = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(merged.item_name)
        .bind(merged.item_description)
        .bind(merged.location_from)
        .bind(merged.location_to)
        .bind(merged.estimated_delivery)
        .bind(merged.estimated_cost)
        .bind(merged.client_review_status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        // orders and invoices go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
