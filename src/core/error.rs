use rust_decimal::Decimal;

use crate::core::period::BillingPeriod;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Billing computation failures
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

/// Billing failure taxonomy.
///
/// Every variant carries enough context (meter name, period, missing fact)
/// to be rendered directly to an end user without further lookups.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    #[error("Tenant {tenant_id} not found")]
    TenantNotFound { tenant_id: String },

    #[error("Invoice {invoice_id} not found")]
    InvoiceNotFound { invoice_id: String },

    #[error("No reading for meter \"{meter_name}\" in {period}")]
    MissingReading {
        meter_id: String,
        meter_name: String,
        period: BillingPeriod,
    },

    #[error("No active tariff for meter \"{meter_name}\" in {period}")]
    MissingTariff {
        meter_id: String,
        meter_name: String,
        period: BillingPeriod,
    },

    #[error(
        "Submeter consumption {children_total} exceeds consumption {parent_consumption} \
         of parent meter \"{parent_name}\""
    )]
    SubmeterExceedsParent {
        parent_id: String,
        parent_name: String,
        parent_consumption: Decimal,
        children_total: Decimal,
    },
}
