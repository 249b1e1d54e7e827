use rust_decimal::Decimal;
use serde::Serialize;

use crate::modules::meters::models::Meter;
use crate::modules::tariffs::models::Tariff;

/// The calculation result for a single meter.
///
/// Carries everything downstream reporting needs to explain the number to a
/// human: the billed consumption, the unfloored raw delta, and the adjustment
/// that was subtracted, alongside the resolved tariff.
#[derive(Debug, Clone, Serialize)]
pub struct MeterBillingResult {
    pub meter: Meter,

    /// Tariff resolved for the billed period
    pub tariff: Tariff,

    /// Billable consumption after adjustments and deduction policy
    pub consumption: Decimal,

    /// `consumption * tariff.rate`, unrounded
    pub cost: Decimal,

    /// `current.value - previous.value` without floor or adjustment
    pub raw_consumption: Decimal,

    /// Manual adjustment taken from the period's reading
    pub adjustment: Decimal,
}
