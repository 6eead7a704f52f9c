use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::invoice::{Invoice, InvoiceAmounts, NewInvoice};
use crate::utils::errors::{map_unique_violation, AppError, AppResult};

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Inserts an invoice for an order that has none yet. A known amount due
    /// updates the order's payment flag in the same unit of work.
    async fn create(&self, invoice: NewInvoice) -> AppResult<Invoice>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Invoice>>;
    async fn find_by_order(&self, order_id: i64) -> AppResult<Option<Invoice>>;
    async fn list_all(&self) -> AppResult<Vec<Invoice>>;
    /// Invoices whose quote belongs to the given account
    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Invoice>>;
    /// Overlays new amounts, re-checks reconciliation and syncs the order flag
    async fn update(&self, id: i64, changes: InvoiceAmounts) -> AppResult<Option<Invoice>>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn sync_payment_flag(
    tx: &mut Transaction<'_, Postgres>,
    order_id: i64,
    amounts: &InvoiceAmounts,
) -> AppResult<()> {
    if let Some(complete) = amounts.payment_complete() {
        sqlx::query(
            "UPDATE orders SET payment_complete_status = $2, updated_ts = NOW() WHERE id = $1",
        )
        .bind(order_id)
        .bind(complete)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    async fn create(&self, invoice: NewInvoice) -> AppResult<Invoice> {
        invoice.amounts.check()?;

        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM invoices WHERE order_id = $1")
            .bind(invoice.order_id)
            .fetch_optional(&mut *tx)
            .await?;
        if let Some((existing_id,)) = existing {
            return Err(AppError::Conflict(format!(
                "Order {} already has invoice {}",
                invoice.order_id, existing_id
            )));
        }

        let created = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (total_amount, amount_paid, amount_due, order_id, quote_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(invoice.amounts.total_amount)
        .bind(invoice.amounts.amount_paid)
        .bind(invoice.amounts.amount_due)
        .bind(invoice.order_id)
        .bind(invoice.quote_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Order is already invoiced"))?;

        sync_payment_flag(&mut tx, created.order_id, &invoice.amounts).await?;

        tx.commit().await?;
        log::info!("🧾 Invoice {} issued for order {}", created.id, created.order_id);
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(invoice)
    }

    async fn find_by_order(&self, order_id: i64) -> AppResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE order_id = $1")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(invoice)
    }

    async fn list_all(&self) -> AppResult<Vec<Invoice>> {
        let invoices =
            sqlx::query_as::<_, Invoice>("SELECT * FROM invoices ORDER BY created_ts DESC, id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(invoices)
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT i.*
            FROM invoices i
            JOIN quotes q ON q.id = i.quote_id
            WHERE q.user_id = $1
            ORDER BY i.created_ts DESC, i.id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(invoices)
    }

    async fn update(&self, id: i64, changes: InvoiceAmounts) -> AppResult<Option<Invoice>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let merged = current.amounts().merge(changes);
        merged.check()?;

        let updated = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET total_amount = $2, amount_paid = $3, amount_due = $4, updated_ts = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(merged.total_amount)
        .bind(merged.amount_paid)
        .bind(merged.amount_due)
        .fetch_one(&mut *tx)
        .await?;

        sync_payment_flag(&mut tx, updated.order_id, &merged).await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
