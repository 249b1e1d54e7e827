use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::MySqlPool;
use tracing::warn;

use crate::core::{AppError, Result};
use crate::modules::tariffs::models::{select_active, Tariff};

/// Store contract for tariffs
#[async_trait]
pub trait TariffRepository: Send + Sync {
    /// Persist a new tariff
    async fn create(&self, tariff: &Tariff) -> Result<()>;

    /// The single tariff effective for a meter on `date`, if any.
    ///
    /// When several windows cover the date, the most recently started one
    /// wins and the anomaly is logged — duplicates are a data-integrity
    /// problem, not a failure.
    async fn find_for_date(&self, meter_id: &str, date: NaiveDate) -> Result<Option<Tariff>>;

    /// The meter's currently open-ended tariff, if any
    async fn find_open(&self, meter_id: &str) -> Result<Option<Tariff>>;

    /// Close a tariff's window at `period_end` (inclusive)
    async fn close(&self, tariff_id: &str, period_end: NaiveDate) -> Result<()>;

    /// Every tariff in the installation, newest first
    async fn list_all(&self) -> Result<Vec<Tariff>>;
}

/// MySQL-backed tariff repository
pub struct MySqlTariffRepository {
    pool: MySqlPool,
}

impl MySqlTariffRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TariffRepository for MySqlTariffRepository {
    async fn create(&self, tariff: &Tariff) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tariffs (
                id, meter_id, name, rate, period_start, period_end, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tariff.id)
        .bind(&tariff.meter_id)
        .bind(&tariff.name)
        .bind(tariff.rate)
        .bind(tariff.period_start)
        .bind(tariff.period_end)
        .bind(tariff.created_at)
        .bind(tariff.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_for_date(&self, meter_id: &str, date: NaiveDate) -> Result<Option<Tariff>> {
        let candidates = sqlx::query_as::<_, Tariff>(
            r#"
            SELECT id, meter_id, name, rate, period_start, period_end, created_at, updated_at
            FROM tariffs
            WHERE meter_id = ?
              AND period_start <= ?
              AND (period_end IS NULL OR period_end >= ?)
            "#,
        )
        .bind(meter_id)
        .bind(date)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let (winner, count) = select_active(&candidates, date);
        if count > 1 {
            warn!(
                meter_id,
                %date,
                matches = count,
                "Multiple tariffs active on the same date; picking the most recently started"
            );
        }

        Ok(winner.cloned())
    }

    async fn find_open(&self, meter_id: &str) -> Result<Option<Tariff>> {
        let tariff = sqlx::query_as::<_, Tariff>(
            r#"
            SELECT id, meter_id, name, rate, period_start, period_end, created_at, updated_at
            FROM tariffs
            WHERE meter_id = ? AND period_end IS NULL
            ORDER BY period_start DESC
            LIMIT 1
            "#,
        )
        .bind(meter_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tariff)
    }

    async fn close(&self, tariff_id: &str, period_end: NaiveDate) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tariffs SET period_end = ?, updated_at = ? WHERE id = ?
            "#,
        )
        .bind(period_end)
        .bind(Utc::now())
        .bind(tariff_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Tariff {}", tariff_id)));
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Tariff>> {
        let tariffs = sqlx::query_as::<_, Tariff>(
            r#"
            SELECT id, meter_id, name, rate, period_start, period_end, created_at, updated_at
            FROM tariffs
            ORDER BY period_start DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tariffs)
    }
}
