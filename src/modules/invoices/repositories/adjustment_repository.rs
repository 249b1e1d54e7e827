use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::invoices::models::Adjustment;

/// Store contract for the adjustment ledger
#[async_trait]
pub trait AdjustmentRepository: Send + Sync {
    /// Append an adjustment record; the ledger is never mutated afterwards
    async fn create(&self, adjustment: &Adjustment) -> Result<()>;

    /// All adjustments for an invoice, oldest first
    async fn list_for_invoice(&self, invoice_id: &str) -> Result<Vec<Adjustment>>;
}

/// MySQL-backed adjustment repository
pub struct MySqlAdjustmentRepository {
    pool: MySqlPool,
}

impl MySqlAdjustmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdjustmentRepository for MySqlAdjustmentRepository {
    async fn create(&self, adjustment: &Adjustment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO adjustments (id, invoice_id, amount, description, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&adjustment.id)
        .bind(&adjustment.invoice_id)
        .bind(adjustment.amount)
        .bind(&adjustment.description)
        .bind(adjustment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_invoice(&self, invoice_id: &str) -> Result<Vec<Adjustment>> {
        let adjustments = sqlx::query_as::<_, Adjustment>(
            r#"
            SELECT id, invoice_id, amount, description, created_at
            FROM adjustments
            WHERE invoice_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(adjustments)
    }
}
