use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// Declares that a child meter's consumption is a deduction candidate
/// against a parent meter.
///
/// The link only drives suggestions at reading entry; the deduction itself is
/// realized through the reading's manual adjustment, so re-linking meters
/// never rewrites past invoices. Unique per (parent, child) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeductionLink {
    /// Unique link ID (UUID)
    pub id: String,

    /// The meter the deduction is taken from
    pub parent_meter_id: String,

    /// The meter whose consumption seeds the suggestion
    pub child_meter_id: String,

    /// Short explanation shown to the operator
    pub description: String,

    pub created_at: DateTime<Utc>,
}

impl DeductionLink {
    /// Create a new link with validation
    pub fn new(
        parent_meter_id: impl Into<String>,
        child_meter_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let parent_meter_id = parent_meter_id.into();
        let child_meter_id = child_meter_id.into();
        if parent_meter_id == child_meter_id {
            return Err(AppError::validation(
                "A meter cannot deduct from itself",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            parent_meter_id,
            child_meter_id,
            description: description.into(),
            created_at: Utc::now(),
        })
    }
}
