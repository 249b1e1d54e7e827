mod deduction_link_repository;
mod meter_repository;

pub use deduction_link_repository::{DeductionLinkRepository, MySqlDeductionLinkRepository};
pub use meter_repository::{MeterRepository, MySqlMeterRepository};
