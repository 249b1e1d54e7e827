// Readings module

pub mod models;
pub mod repositories;
pub mod services;

pub use models::Reading;
pub use repositories::{MySqlReadingRepository, ReadingRepository};
pub use services::{DeductionSuggestion, ReadingService};
