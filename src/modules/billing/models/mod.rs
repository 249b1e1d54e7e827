mod billing_result;
mod completeness;

pub use billing_result::MeterBillingResult;
pub use completeness::CompletenessIssue;
