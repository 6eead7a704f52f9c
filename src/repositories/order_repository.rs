use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::order::{NewOrder, Order, OrderChanges, OrderStatus};
use crate::utils::errors::{map_unique_violation, AppError, AppResult};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts an order with a fresh tracking number and status PLACED.
    /// Fails with a conflict when the quote already has an order or the
    /// rider is busy on another open order.
    async fn create(&self, order: NewOrder) -> AppResult<Order>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>>;
    async fn find_by_tracking_number(&self, tracking_number: Uuid) -> AppResult<Option<Order>>;
    async fn find_by_quote(&self, quote_id: i64) -> AppResult<Option<Order>>;
    async fn find_by_rider(&self, rider_id: i64) -> AppResult<Option<Order>>;
    async fn list_all(&self) -> AppResult<Vec<Order>>;
    /// Orders whose quote belongs to the given account
    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Order>>;
    /// Applies field changes atomically, enforcing the status transition table
    /// and the rider link rules
    async fn update(&self, id: i64, changes: OrderChanges) -> AppResult<Option<Order>>;
    /// Removes the order together with its invoice
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Makes the rider available for `order_id`. A rider still on an open order
/// is a conflict; a rider left on a delivered order is released from it.
async fn free_rider(
    tx: &mut Transaction<'_, Postgres>,
    rider_id: i64,
    order_id: Option<i64>,
) -> AppResult<()> {
    let holder: Option<(i64, OrderStatus)> =
        sqlx::query_as("SELECT id, order_status FROM orders WHERE rider_id = $1 FOR UPDATE")
            .bind(rider_id)
            .fetch_optional(&mut **tx)
            .await?;

    match holder {
        Some((holder_id, _)) if Some(holder_id) == order_id => Ok(()),
        Some((holder_id, status)) if status.is_open() => Err(AppError::Conflict(format!(
            "Rider {} is already assigned to open order {}",
            rider_id, holder_id
        ))),
        Some((holder_id, _)) => {
            sqlx::query("UPDATE orders SET rider_id = NULL, updated_ts = NOW() WHERE id = $1")
                .bind(holder_id)
                .execute(&mut **tx)
                .await?;
            log::info!("🏍️ Rider {} released from delivered order {}", rider_id, holder_id);
            Ok(())
        }
        None => Ok(()),
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM orders WHERE quote_id = $1")
            .bind(order.quote_id)
            .fetch_optional(&mut *tx)
            .await?;
        if let Some((existing_id,)) = existing {
            return Err(AppError::Conflict(format!(
                "Quote {} already has order {}",
                order.quote_id, existing_id
            )));
        }

        if let Some(rider_id) = order.rider_id {
            free_rider(&mut tx, rider_id, None).await?;
        }

        let created = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (tracking_number, payment_ref, payment_complete_status, order_status, rider_id, quote_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.payment_ref)
        .bind(order.payment_complete_status)
        .bind(OrderStatus::Placed)
        .bind(order.rider_id)
        .bind(order.quote_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Quote or rider is already linked to another order"))?;

        tx.commit().await?;
        log::info!(
            "📦 Order {} created for quote {} (tracking {})",
            created.id,
            created.quote_id,
            created.tracking_number
        );
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn find_by_tracking_number(&self, tracking_number: Uuid) -> AppResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE tracking_number = $1")
            .bind(tracking_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn find_by_quote(&self, quote_id: i64) -> AppResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE quote_id = $1")
            .bind(quote_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn find_by_rider(&self, rider_id: i64) -> AppResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE rider_id = $1")
            .bind(rider_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn list_all(&self) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_ts DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT o.*
            FROM orders o
            JOIN quotes q ON q.id = o.quote_id
            WHERE q.user_id = $1
            ORDER BY o.created_ts DESC, o.id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    async fn update(&self, id: i64, changes: OrderChanges) -> AppResult<Option<Order>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        if let Some(rider_id) = changes.rider_id {
            if current.rider_id != Some(rider_id) {
                free_rider(&mut tx, rider_id, Some(id)).await?;
            }
        }

        let merged = changes.apply(current)?;

        let updated = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET payment_ref = $2, payment_complete_status = $3, order_status = $4,
                rider_id = $5, updated_ts = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(merged.payment_ref)
        .bind(merged.payment_complete_status)
        .bind(merged.order_status)
        .bind(merged.rider_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Rider is already linked to another order"))?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
