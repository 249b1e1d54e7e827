mod summary_service;

pub use summary_service::{NightlyOutcome, SummaryRow, SummaryService};
