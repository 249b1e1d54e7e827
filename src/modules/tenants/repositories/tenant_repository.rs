use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::tenants::models::Tenant;

/// Store contract for tenants
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Persist a new tenant
    async fn create(&self, tenant: &Tenant) -> Result<()>;

    /// Find a tenant by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>>;

    /// List every tenant, ordered by name
    async fn list_all(&self) -> Result<Vec<Tenant>>;
}

/// MySQL-backed tenant repository
pub struct MySqlTenantRepository {
    pool: MySqlPool,
}

impl MySqlTenantRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for MySqlTenantRepository {
    async fn create(&self, tenant: &Tenant) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tenants (id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&tenant.id)
        .bind(&tenant.name)
        .bind(tenant.created_at)
        .bind(tenant.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::validation(format!(
                        "Tenant named '{}' already exists",
                        tenant.name
                    ));
                }
            }
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM tenants
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }

    async fn list_all(&self) -> Result<Vec<Tenant>> {
        let tenants = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM tenants
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tenants)
    }
}
