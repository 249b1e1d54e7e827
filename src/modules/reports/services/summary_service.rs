use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::core::{AppError, BillingPeriod, Result};
use crate::modules::billing::services::BillingService;
use crate::modules::tenants::repositories::TenantRepository;

/// One tenant's line in a multi-tenant period summary
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub tenant_id: String,
    pub tenant_name: String,

    /// Invoice amount; zero when generation failed for this tenant
    pub amount: Decimal,

    /// Human-readable reason the amount is missing, if it is
    pub failure: Option<String>,
}

/// Result counts of a nightly batch run
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NightlyOutcome {
    pub generated: usize,
    pub failed: usize,
}

/// Multi-tenant reporting and batch generation.
///
/// Both entry points iterate tenants one at a time and keep each tenant's
/// failure isolated: one broken meter must never stall everyone else's
/// billing.
pub struct SummaryService {
    tenant_repo: Arc<dyn TenantRepository>,
    billing: Arc<BillingService>,
}

impl SummaryService {
    pub fn new(tenant_repo: Arc<dyn TenantRepository>, billing: Arc<BillingService>) -> Self {
        Self {
            tenant_repo,
            billing,
        }
    }

    /// Generate every tenant's invoice for `period` and collect the amounts.
    ///
    /// A tenant whose data is incomplete gets a zero row with the failure
    /// message attached; store errors still propagate.
    pub async fn generate_summary(&self, period: BillingPeriod) -> Result<Vec<SummaryRow>> {
        let tenants = self.tenant_repo.list_all().await?;
        let mut rows = Vec::with_capacity(tenants.len());

        for tenant in tenants {
            match self.billing.generate_invoice(&tenant.id, period).await {
                Ok((invoice, _)) => rows.push(SummaryRow {
                    tenant_id: tenant.id,
                    tenant_name: tenant.name,
                    amount: invoice.amount,
                    failure: None,
                }),
                Err(AppError::Billing(e)) => {
                    warn!(tenant = %tenant.name, %period, error = %e, "Skipping tenant in summary");
                    rows.push(SummaryRow {
                        tenant_id: tenant.id,
                        tenant_name: tenant.name,
                        amount: Decimal::ZERO,
                        failure: Some(e.to_string()),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(rows)
    }

    /// Nightly batch: generate invoices for all tenants for `period`.
    ///
    /// Every failure is logged and counted, never propagated — the batch
    /// always runs to the end of the tenant list.
    pub async fn run_nightly(&self, period: BillingPeriod) -> Result<NightlyOutcome> {
        info!(%period, "Starting nightly billing run");

        let tenants = self.tenant_repo.list_all().await?;
        let mut outcome = NightlyOutcome::default();

        for tenant in &tenants {
            match self.billing.generate_invoice(&tenant.id, period).await {
                Ok((invoice, _)) => {
                    info!(
                        tenant = %tenant.name,
                        amount = %invoice.amount,
                        "Generated invoice"
                    );
                    outcome.generated += 1;
                }
                Err(e) => {
                    error!(
                        tenant = %tenant.name,
                        %period,
                        error = %e,
                        "Failed to generate invoice"
                    );
                    outcome.failed += 1;
                }
            }
        }

        info!(
            generated = outcome.generated,
            failed = outcome.failed,
            "Nightly billing run finished"
        );

        Ok(outcome)
    }
}
