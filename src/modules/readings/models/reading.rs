use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, BillingPeriod, Result};

/// A meter reading recorded for one billing period.
///
/// At most one reading exists per (meter, period); re-entering a value for
/// the same period overwrites it, and regenerating the invoice afterwards
/// recomputes the amount.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reading {
    /// Unique reading ID (UUID)
    pub id: String,

    pub meter_id: String,

    /// First day of the billing month
    pub period: NaiveDate,

    /// Cumulative meter value at entry time
    pub value: Decimal,

    /// Consumption to exclude for this period, e.g. a known submeter share.
    /// Always non-negative; subtracted from the raw delta before costing.
    pub manual_adjustment: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reading {
    /// Create a new reading with validation
    pub fn new(
        meter_id: impl Into<String>,
        period: BillingPeriod,
        value: Decimal,
        manual_adjustment: Decimal,
    ) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(AppError::validation("Reading value must not be negative"));
        }
        if manual_adjustment < Decimal::ZERO {
            return Err(AppError::validation(
                "Manual adjustment must not be negative",
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            meter_id: meter_id.into(),
            period: period.first_day(),
            value,
            manual_adjustment,
            created_at: now,
            updated_at: now,
        })
    }

    /// The billing period this reading belongs to
    pub fn billing_period(&self) -> BillingPeriod {
        BillingPeriod::new(self.period)
    }
}
