mod tenant_repository;

pub use tenant_repository::{MySqlTenantRepository, TenantRepository};
