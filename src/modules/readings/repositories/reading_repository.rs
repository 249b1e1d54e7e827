use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{AppError, BillingPeriod, Result};
use crate::modules::readings::models::Reading;

/// Store contract for readings
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Readings for a meter with `start_date <= period <= end_date`,
    /// ordered by period
    async fn get_for_period(
        &self,
        meter_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Reading>>;

    /// Insert or overwrite the reading for (meter, period)
    async fn upsert(
        &self,
        meter_id: &str,
        period: BillingPeriod,
        value: Decimal,
        manual_adjustment: Decimal,
    ) -> Result<Reading>;
}

/// The single reading recorded for a billing period, if any
pub(crate) async fn find_for_billing_period(
    repo: &dyn ReadingRepository,
    meter_id: &str,
    period: BillingPeriod,
) -> Result<Option<Reading>> {
    let day = period.first_day();
    let mut readings = repo.get_for_period(meter_id, day, day).await?;
    Ok(readings.pop())
}

/// MySQL-backed reading repository
pub struct MySqlReadingRepository {
    pool: MySqlPool,
}

impl MySqlReadingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingRepository for MySqlReadingRepository {
    async fn get_for_period(
        &self,
        meter_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Reading>> {
        let readings = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, meter_id, period, value, manual_adjustment, created_at, updated_at
            FROM readings
            WHERE meter_id = ? AND period >= ? AND period <= ?
            ORDER BY period
            "#,
        )
        .bind(meter_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    async fn upsert(
        &self,
        meter_id: &str,
        period: BillingPeriod,
        value: Decimal,
        manual_adjustment: Decimal,
    ) -> Result<Reading> {
        let reading = Reading::new(meter_id, period, value, manual_adjustment)?;

        // The UNIQUE (meter_id, period) key makes re-entry an overwrite
        sqlx::query(
            r#"
            INSERT INTO readings (
                id, meter_id, period, value, manual_adjustment, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                value = VALUES(value),
                manual_adjustment = VALUES(manual_adjustment),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(&reading.id)
        .bind(&reading.meter_id)
        .bind(reading.period)
        .bind(reading.value)
        .bind(reading.manual_adjustment)
        .bind(reading.created_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let stored = find_for_billing_period(self, meter_id, period)
            .await?
            .ok_or_else(|| AppError::internal("Reading missing after upsert"))?;

        Ok(stored)
    }
}
