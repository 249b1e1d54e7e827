use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::{AppError, BillingPeriod, Result};
use crate::modules::invoices::models::Invoice;

/// Store contract for invoices
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Find an invoice by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>>;

    /// The invoice for (tenant, period), if one was generated
    async fn find_by_tenant_period(
        &self,
        tenant_id: &str,
        period: BillingPeriod,
    ) -> Result<Option<Invoice>>;

    /// Create the invoice for (tenant, period) or overwrite its amount.
    ///
    /// The unique key makes regeneration idempotent: the last writer wins.
    async fn upsert(
        &self,
        tenant_id: &str,
        period: BillingPeriod,
        amount: Decimal,
    ) -> Result<Invoice>;

    /// Add `delta` (possibly negative) to an invoice's stored amount
    async fn increment_amount(&self, invoice_id: &str, delta: Decimal) -> Result<()>;
}

/// MySQL-backed invoice repository
pub struct MySqlInvoiceRepository {
    pool: MySqlPool,
}

impl MySqlInvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for MySqlInvoiceRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, tenant_id, period, amount, created_at, updated_at
            FROM invoices
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    async fn find_by_tenant_period(
        &self,
        tenant_id: &str,
        period: BillingPeriod,
    ) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, tenant_id, period, amount, created_at, updated_at
            FROM invoices
            WHERE tenant_id = ? AND period = ?
            "#,
        )
        .bind(tenant_id)
        .bind(period.first_day())
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    async fn upsert(
        &self,
        tenant_id: &str,
        period: BillingPeriod,
        amount: Decimal,
    ) -> Result<Invoice> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO invoices (id, tenant_id, period, amount, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                amount = VALUES(amount),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(tenant_id)
        .bind(period.first_day())
        .bind(amount)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let stored = self
            .find_by_tenant_period(tenant_id, period)
            .await?
            .ok_or_else(|| AppError::internal("Invoice missing after upsert"))?;

        Ok(stored)
    }

    async fn increment_amount(&self, invoice_id: &str, delta: Decimal) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE invoices SET amount = amount + ?, updated_at = ? WHERE id = ?
            "#,
        )
        .bind(delta)
        .bind(Utc::now())
        .bind(invoice_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Invoice {}", invoice_id)));
        }

        Ok(())
    }
}
