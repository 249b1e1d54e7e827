mod reading_repository;

pub use reading_repository::{MySqlReadingRepository, ReadingRepository};
pub(crate) use reading_repository::find_for_billing_period;
