use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::core::{AppError, BillingPeriod, Result};
use crate::modules::meters::repositories::{DeductionLinkRepository, MeterRepository};
use crate::modules::readings::models::Reading;
use crate::modules::readings::repositories::{find_for_billing_period, ReadingRepository};

/// A proposed manual adjustment, seeded by a linked submeter's raw delta.
///
/// Shown to the operator at reading entry; the operator decides whether to
/// accept the amount into the reading's manual adjustment.
#[derive(Debug, Clone, Serialize)]
pub struct DeductionSuggestion {
    pub child_meter_id: String,
    pub child_meter_name: String,

    /// Link description explaining the deduction rule
    pub description: String,

    /// Raw consumption delta of the child meter for the period
    pub amount: Decimal,
}

/// Service for the reading entry workflow
pub struct ReadingService {
    reading_repo: Arc<dyn ReadingRepository>,
    meter_repo: Arc<dyn MeterRepository>,
    link_repo: Arc<dyn DeductionLinkRepository>,
}

impl ReadingService {
    pub fn new(
        reading_repo: Arc<dyn ReadingRepository>,
        meter_repo: Arc<dyn MeterRepository>,
        link_repo: Arc<dyn DeductionLinkRepository>,
    ) -> Self {
        Self {
            reading_repo,
            meter_repo,
            link_repo,
        }
    }

    /// Record a reading for (meter, period), overwriting any prior value.
    ///
    /// Overwriting is deliberate: corrected readings are re-entered and the
    /// invoice is regenerated afterwards.
    pub async fn record_reading(
        &self,
        meter_id: &str,
        period: BillingPeriod,
        value: Decimal,
        manual_adjustment: Option<Decimal>,
    ) -> Result<Reading> {
        let meter = self
            .meter_repo
            .find_by_id(meter_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Meter {}", meter_id)))?;

        let adjustment = manual_adjustment.unwrap_or(Decimal::ZERO);
        let reading = self
            .reading_repo
            .upsert(meter_id, period, value, adjustment)
            .await?;

        info!(
            meter = %meter.name,
            period = %period,
            value = %value,
            adjustment = %adjustment,
            "Recorded reading"
        );

        Ok(reading)
    }

    /// Suggest a manual adjustment for a parent meter from its first
    /// deduction link.
    ///
    /// Returns `None` when the meter has no link or the linked child is
    /// missing either reading for the period — a suggestion is a convenience,
    /// never a requirement.
    pub async fn suggest_deduction(
        &self,
        parent_meter_id: &str,
        period: BillingPeriod,
    ) -> Result<Option<DeductionSuggestion>> {
        let links = self.link_repo.find_by_parent(parent_meter_id).await?;
        let Some(link) = links.into_iter().next() else {
            return Ok(None);
        };

        let Some(child_meter) = self.meter_repo.find_by_id(&link.child_meter_id).await? else {
            return Ok(None);
        };

        let current =
            find_for_billing_period(self.reading_repo.as_ref(), &child_meter.id, period).await?;
        let previous = find_for_billing_period(
            self.reading_repo.as_ref(),
            &child_meter.id,
            period.previous(),
        )
        .await?;

        let (Some(current), Some(previous)) = (current, previous) else {
            return Ok(None);
        };

        // Suggest the raw delta; the operator may still adjust it
        let amount = current.value - previous.value;
        if amount < Decimal::ZERO {
            return Ok(None);
        }

        Ok(Some(DeductionSuggestion {
            child_meter_id: child_meter.id,
            child_meter_name: child_meter.name,
            description: link.description,
            amount,
        }))
    }
}
