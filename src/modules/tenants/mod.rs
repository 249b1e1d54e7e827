// Tenants module

pub mod models;
pub mod repositories;

pub use models::Tenant;
pub use repositories::{MySqlTenantRepository, TenantRepository};
