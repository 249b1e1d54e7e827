pub mod billing;
pub mod invoices;
pub mod meters;
pub mod readings;
pub mod reports;
pub mod tariffs;
pub mod tenants;
