// Invoices module

pub mod models;
pub mod repositories;

pub use models::{Adjustment, Invoice};
pub use repositories::{
    AdjustmentRepository, InvoiceRepository, MySqlAdjustmentRepository, MySqlInvoiceRepository,
};
