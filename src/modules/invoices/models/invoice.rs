use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::BillingPeriod;

/// One monetary amount billed to a tenant for one billing period.
///
/// Unique per (tenant, period): regeneration overwrites the amount in place,
/// which makes invoice generation idempotent and safe to re-run after
/// reading corrections. Only the computed amount is stored — the per-meter
/// breakdown is returned to callers, not persisted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    /// Unique invoice ID (UUID)
    pub id: String,

    pub tenant_id: String,

    /// First day of the billed month
    pub period: NaiveDate,

    /// Total amount, including any manual adjustments applied afterwards
    pub amount: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// The billing period this invoice covers
    pub fn billing_period(&self) -> BillingPeriod {
        BillingPeriod::new(self.period)
    }
}
