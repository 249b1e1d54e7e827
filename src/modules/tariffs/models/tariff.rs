use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A time-bounded monetary rate per unit of consumption for one meter.
///
/// The window is inclusive on both ends; `period_end = None` means the tariff
/// is open-ended (current). Windows of the same meter should not overlap, but
/// the schema does not forbid it — resolution picks deterministically.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tariff {
    /// Unique tariff ID (UUID)
    pub id: String,

    pub meter_id: String,

    /// Template label, e.g. "Standard" or "Night rate"
    pub name: String,

    /// Rate per consumed unit, four fractional digits of precision
    pub rate: Decimal,

    pub period_start: NaiveDate,

    /// Inclusive end of the window; `None` = open-ended
    pub period_end: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tariff {
    /// Create a new open-ended tariff with validation
    pub fn new(
        meter_id: impl Into<String>,
        name: impl Into<String>,
        rate: Decimal,
        period_start: NaiveDate,
    ) -> Result<Self> {
        if rate < Decimal::ZERO {
            return Err(AppError::validation("Tariff rate must not be negative"));
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("Tariff name must not be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            meter_id: meter_id.into(),
            name,
            rate,
            period_start,
            period_end: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether this tariff's window covers `date`
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.period_start <= date && self.period_end.map_or(true, |end| end >= date)
    }
}

/// Pick the single tariff effective on `date` from a candidate list.
///
/// Tie-break when several windows cover the date (an upstream data-integrity
/// problem): the most recently started tariff wins. Callers should treat a
/// multi-match as a warning, which is why the match count is returned
/// alongside the winner.
pub fn select_active(candidates: &[Tariff], date: NaiveDate) -> (Option<&Tariff>, usize) {
    let mut matches: Vec<&Tariff> = candidates
        .iter()
        .filter(|t| t.is_active_on(date))
        .collect();
    matches.sort_by_key(|t| t.period_start);
    let count = matches.len();
    (matches.pop(), count)
}
