use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// An append-only signed correction to an invoice.
///
/// Applying one adds `amount` to the invoice's stored total and leaves this
/// record as the permanent explanation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Adjustment {
    /// Unique adjustment ID (UUID)
    pub id: String,

    pub invoice_id: String,

    /// Signed monetary correction
    pub amount: Decimal,

    /// Short explanation shown to users
    pub description: String,

    pub created_at: DateTime<Utc>,
}

impl Adjustment {
    /// Create a new adjustment with validation
    pub fn new(
        invoice_id: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(AppError::validation(
                "Adjustment description must not be empty",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.into(),
            amount,
            description,
            created_at: Utc::now(),
        })
    }
}
