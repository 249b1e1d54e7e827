mod tenant;

pub use tenant::Tenant;
