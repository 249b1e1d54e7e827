use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::meters::models::Meter;

/// Store contract for meters
#[async_trait]
pub trait MeterRepository: Send + Sync {
    /// Persist a new meter
    async fn create(&self, meter: &Meter) -> Result<()>;

    /// Find a meter by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Meter>>;

    /// All meters owned by a tenant, ordered by name
    async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<Meter>>;

    /// Rename a meter
    async fn rename(&self, id: &str, name: &str) -> Result<()>;

    /// Set or clear the strict-subtraction parent of a meter
    async fn set_subtract_from(&self, id: &str, parent_id: Option<&str>) -> Result<()>;
}

/// MySQL-backed meter repository
pub struct MySqlMeterRepository {
    pool: MySqlPool,
}

impl MySqlMeterRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeterRepository for MySqlMeterRepository {
    async fn create(&self, meter: &Meter) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO meters (
                id, tenant_id, name, resource_type, subtract_from, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&meter.id)
        .bind(&meter.tenant_id)
        .bind(&meter.name)
        .bind(meter.resource_type)
        .bind(&meter.subtract_from)
        .bind(meter.created_at)
        .bind(meter.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Meter>> {
        let meter = sqlx::query_as::<_, Meter>(
            r#"
            SELECT id, tenant_id, name, resource_type, subtract_from, created_at, updated_at
            FROM meters
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(meter)
    }

    async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<Meter>> {
        let meters = sqlx::query_as::<_, Meter>(
            r#"
            SELECT id, tenant_id, name, resource_type, subtract_from, created_at, updated_at
            FROM meters
            WHERE tenant_id = ?
            ORDER BY name
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(meters)
    }

    async fn rename(&self, id: &str, name: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE meters SET name = ?, updated_at = ? WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Meter {}", id)));
        }

        Ok(())
    }

    async fn set_subtract_from(&self, id: &str, parent_id: Option<&str>) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE meters SET subtract_from = ?, updated_at = ? WHERE id = ?
            "#,
        )
        .bind(parent_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Meter {}", id)));
        }

        Ok(())
    }
}
