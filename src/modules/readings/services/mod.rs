mod reading_service;

pub use reading_service::{DeductionSuggestion, ReadingService};
