use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::BillingError;
use crate::modules::billing::calculations;
use crate::modules::billing::models::MeterBillingResult;

/// How submeter consumption is removed from a parent meter's billable total.
///
/// Two generations of the deduction mechanism coexist; which one a
/// deployment runs with is configuration, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionPolicy {
    /// Submeters declare a structural `subtract_from` parent. After every
    /// meter is billed independently, each parent's consumption is reduced
    /// by the sum of its children's consumption and its cost recomputed at
    /// the parent's own rate. A negative remainder is a billing failure.
    StrictSubtraction,

    /// The deduction was already decided at data-entry time through the
    /// reading's manual adjustment. No cross-meter pass; a negative
    /// post-adjustment consumption is floored to zero.
    FloorAdjustment,
}

impl Default for DeductionPolicy {
    fn default() -> Self {
        DeductionPolicy::FloorAdjustment
    }
}

impl std::fmt::Display for DeductionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeductionPolicy::StrictSubtraction => write!(f, "strict_subtraction"),
            DeductionPolicy::FloorAdjustment => write!(f, "floor_adjustment"),
        }
    }
}

impl std::str::FromStr for DeductionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "strict_subtraction" => Ok(DeductionPolicy::StrictSubtraction),
            "floor_adjustment" => Ok(DeductionPolicy::FloorAdjustment),
            _ => Err(format!("Invalid deduction policy: {}", s)),
        }
    }
}

impl DeductionPolicy {
    /// Finalize one meter's post-adjustment consumption before costing
    pub(crate) fn finalize_consumption(&self, consumption: Decimal) -> Decimal {
        match self {
            DeductionPolicy::FloorAdjustment => consumption.max(Decimal::ZERO),
            DeductionPolicy::StrictSubtraction => consumption,
        }
    }

    /// Cross-meter resolution pass over one tenant's independent results
    pub(crate) fn apply(
        &self,
        results: &mut HashMap<String, MeterBillingResult>,
    ) -> std::result::Result<(), BillingError> {
        match self {
            DeductionPolicy::FloorAdjustment => Ok(()),
            DeductionPolicy::StrictSubtraction => apply_strict_subtraction(results),
        }
    }
}

/// Rewrites each parent result with the consumption remaining after its
/// submeters, costed at the parent's rate.
///
/// All child consumptions of a parent are summed before the subtraction, so
/// the outcome never depends on the order children are processed in.
/// The subtraction deliberately uses the parent's rate even though the
/// consumption occurred on the child meter: that neutralizes the
/// double-billing at whichever rate the parent is charged, while the child's
/// own cost stays untouched.
fn apply_strict_subtraction(
    results: &mut HashMap<String, MeterBillingResult>,
) -> std::result::Result<(), BillingError> {
    let mut deductions: HashMap<String, Decimal> = HashMap::new();

    for result in results.values() {
        let Some(parent_id) = &result.meter.subtract_from else {
            continue;
        };
        if !results.contains_key(parent_id) {
            // Parent outside this tenant's meters (re-parented or deleted);
            // nothing to deduct from here.
            warn!(
                meter = %result.meter.name,
                parent_id = %parent_id,
                "Submeter parent is not among the billed meters; skipping deduction"
            );
            continue;
        }

        *deductions.entry(parent_id.clone()).or_default() += result.consumption;
    }

    for (parent_id, children_total) in deductions {
        let parent = results
            .get_mut(&parent_id)
            .expect("deduction keys come from the results map");

        let remaining = parent.consumption - children_total;
        if remaining < Decimal::ZERO {
            return Err(BillingError::SubmeterExceedsParent {
                parent_id: parent.meter.id.clone(),
                parent_name: parent.meter.name.clone(),
                parent_consumption: parent.consumption,
                children_total,
            });
        }

        parent.consumption = remaining;
        parent.cost = calculations::cost(remaining, parent.tariff.rate);
    }

    Ok(())
}
