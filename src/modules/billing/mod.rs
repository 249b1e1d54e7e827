// Billing module — the computation engine

pub mod calculations;
pub mod models;
pub mod services;

pub use models::{CompletenessIssue, MeterBillingResult};
pub use services::{BillingService, DeductionPolicy};
