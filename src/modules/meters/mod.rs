// Meters module

pub mod models;
pub mod repositories;

pub use models::{DeductionLink, Meter, ResourceType};
pub use repositories::{
    DeductionLinkRepository, MeterRepository, MySqlDeductionLinkRepository, MySqlMeterRepository,
};
