// Reports module

pub mod services;

pub use services::{NightlyOutcome, SummaryRow, SummaryService};
