use std::fmt;

use serde::Serialize;

use crate::core::BillingPeriod;

/// One missing fact preventing a clean invoice generation.
///
/// The pre-flight dual of the billing failure path: collected into a list
/// and rendered to the operator instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompletenessIssue {
    UnknownTenant {
        tenant_id: String,
    },
    MissingReading {
        meter_id: String,
        meter_name: String,
        period: BillingPeriod,
    },
    MissingTariff {
        meter_id: String,
        meter_name: String,
        period: BillingPeriod,
    },
}

impl fmt::Display for CompletenessIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletenessIssue::UnknownTenant { tenant_id } => {
                write!(f, "Tenant {} not found", tenant_id)
            }
            CompletenessIssue::MissingReading {
                meter_name, period, ..
            } => {
                write!(f, "No reading for meter \"{}\" in {}", meter_name, period)
            }
            CompletenessIssue::MissingTariff {
                meter_name, period, ..
            } => {
                write!(
                    f,
                    "No active tariff for meter \"{}\" in {}",
                    meter_name, period
                )
            }
        }
    }
}
