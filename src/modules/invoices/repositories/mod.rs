mod adjustment_repository;
mod invoice_repository;

pub use adjustment_repository::{AdjustmentRepository, MySqlAdjustmentRepository};
pub use invoice_repository::{InvoiceRepository, MySqlInvoiceRepository};
