use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::rider::{NewRider, Rider, RiderChanges};
use crate::utils::errors::{map_unique_violation, AppResult};

#[async_trait]
pub trait RiderRepository: Send + Sync {
    async fn create(&self, rider: NewRider) -> AppResult<Rider>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Rider>>;
    async fn list_all(&self) -> AppResult<Vec<Rider>>;
    async fn update(&self, id: i64, changes: RiderChanges) -> AppResult<Option<Rider>>;
    /// Removes the rider; an order it was riding keeps going without one
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

pub struct PgRiderRepository {
    pool: PgPool,
}

impl PgRiderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RiderRepository for PgRiderRepository {
    async fn create(&self, rider: NewRider) -> AppResult<Rider> {
        let created = sqlx::query_as::<_, Rider>(
            r#"
            INSERT INTO riders (rider_name, rider_motor, rider_phone)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(rider.rider_name)
        .bind(rider.rider_motor)
        .bind(rider.rider_phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Rider phone is already registered"))?;

        log::info!("🏍️ Rider {} registered", created.id);
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Rider>> {
        let rider = sqlx::query_as::<_, Rider>("SELECT * FROM riders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rider)
    }

    async fn list_all(&self) -> AppResult<Vec<Rider>> {
        let riders = sqlx::query_as::<_, Rider>("SELECT * FROM riders ORDER BY created_ts DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(riders)
    }

    async fn update(&self, id: i64, changes: RiderChanges) -> AppResult<Option<Rider>> {
        let Some(current) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let merged = changes.apply(current);

        let updated = sqlx::query_as::<_, Rider>(
            r#"
            UPDATE riders
            SET rider_name = $2, rider_motor = $3, rider_phone = $4, updated_ts = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(merged.rider_name)
        .bind(merged.rider_motor)
        .bind(merged.rider_phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Rider phone is already registered"))?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM riders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
