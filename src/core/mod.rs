pub mod error;
pub mod period;

pub use error::{AppError, BillingError, Result};
pub use period::BillingPeriod;
