use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::tariffs::models::Tariff;
use crate::modules::tariffs::repositories::TariffRepository;

/// A reusable (name, rate) pair offered when assigning tariffs to new meters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TariffTemplate {
    pub name: String,
    pub rate: Decimal,
}

/// Existing tariffs de-duplicated by (name, rate), order of first appearance
pub fn distinct_templates(tariffs: &[Tariff]) -> Vec<TariffTemplate> {
    let mut templates: Vec<TariffTemplate> = Vec::new();
    for tariff in tariffs {
        let seen = templates
            .iter()
            .any(|t| t.name == tariff.name && t.rate == tariff.rate);
        if !seen {
            templates.push(TariffTemplate {
                name: tariff.name.clone(),
                rate: tariff.rate,
            });
        }
    }
    templates
}

/// Service for the tariff lifecycle
pub struct TariffService {
    tariff_repo: Arc<dyn TariffRepository>,
}

impl TariffService {
    pub fn new(tariff_repo: Arc<dyn TariffRepository>) -> Self {
        Self { tariff_repo }
    }

    /// Create a new open-ended tariff for a meter.
    ///
    /// The meter's previously open tariff is closed at the day before the new
    /// start, so at most one open window exists per meter going forward.
    pub async fn create_tariff(
        &self,
        meter_id: &str,
        name: &str,
        rate: Decimal,
        period_start: NaiveDate,
    ) -> Result<Tariff> {
        // Validate the replacement before touching the open tariff
        let tariff = Tariff::new(meter_id, name, rate, period_start)?;

        if let Some(open) = self.tariff_repo.find_open(meter_id).await? {
            if open.period_start >= period_start {
                return Err(AppError::validation(format!(
                    "New tariff must start after {} (start of the current tariff)",
                    open.period_start
                )));
            }

            let end = period_start
                .checked_sub_days(Days::new(1))
                .expect("tariff start has a previous day");
            self.tariff_repo.close(&open.id, end).await?;

            info!(
                meter_id,
                closed_tariff = %open.id,
                period_end = %end,
                "Closed previous tariff"
            );
        }

        self.tariff_repo.create(&tariff).await?;

        info!(
            meter_id,
            tariff = %tariff.id,
            rate = %rate,
            period_start = %period_start,
            "Created tariff"
        );

        Ok(tariff)
    }

    /// Existing (name, rate) pairs offered as copy templates in entry UIs
    pub async fn templates(&self) -> Result<Vec<TariffTemplate>> {
        let tariffs = self.tariff_repo.list_all().await?;
        Ok(distinct_templates(&tariffs))
    }
}
