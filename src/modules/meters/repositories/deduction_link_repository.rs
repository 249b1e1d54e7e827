use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::meters::models::DeductionLink;

/// Store contract for deduction links
#[async_trait]
pub trait DeductionLinkRepository: Send + Sync {
    /// Persist a new link; (parent, child) pairs are unique
    async fn create(&self, link: &DeductionLink) -> Result<()>;

    /// Links whose deduction is taken from the given meter
    async fn find_by_parent(&self, parent_meter_id: &str) -> Result<Vec<DeductionLink>>;

    /// Links whose suggestion is seeded by the given meter
    async fn find_by_child(&self, child_meter_id: &str) -> Result<Vec<DeductionLink>>;
}

/// MySQL-backed deduction link repository
pub struct MySqlDeductionLinkRepository {
    pool: MySqlPool,
}

impl MySqlDeductionLinkRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeductionLinkRepository for MySqlDeductionLinkRepository {
    async fn create(&self, link: &DeductionLink) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO deduction_links (
                id, parent_meter_id, child_meter_id, description, created_at
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&link.id)
        .bind(&link.parent_meter_id)
        .bind(&link.child_meter_id)
        .bind(&link.description)
        .bind(link.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::validation(
                        "A deduction link between these meters already exists",
                    );
                }
            }
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn find_by_parent(&self, parent_meter_id: &str) -> Result<Vec<DeductionLink>> {
        let links = sqlx::query_as::<_, DeductionLink>(
            r#"
            SELECT id, parent_meter_id, child_meter_id, description, created_at
            FROM deduction_links
            WHERE parent_meter_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(parent_meter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    async fn find_by_child(&self, child_meter_id: &str) -> Result<Vec<DeductionLink>> {
        let links = sqlx::query_as::<_, DeductionLink>(
            r#"
            SELECT id, parent_meter_id, child_meter_id, description, created_at
            FROM deduction_links
            WHERE child_meter_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(child_meter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }
}
