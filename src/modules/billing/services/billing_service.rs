use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::core::{BillingError, BillingPeriod, Result};
use crate::modules::billing::calculations;
use crate::modules::billing::models::{CompletenessIssue, MeterBillingResult};
use crate::modules::billing::services::DeductionPolicy;
use crate::modules::invoices::models::{Adjustment, Invoice};
use crate::modules::invoices::repositories::{AdjustmentRepository, InvoiceRepository};
use crate::modules::meters::models::Meter;
use crate::modules::meters::repositories::MeterRepository;
use crate::modules::readings::repositories::{find_for_billing_period, ReadingRepository};
use crate::modules::tariffs::repositories::TariffRepository;
use crate::modules::tenants::repositories::TenantRepository;

/// Orchestrates the invoice generation process.
///
/// One invocation is a self-contained, sequential unit of work: bill every
/// meter independently, run the deduction policy, sum, upsert the invoice.
/// Any single meter's failure aborts the whole invoice — the engine never
/// bills "what it can".
pub struct BillingService {
    tenant_repo: Arc<dyn TenantRepository>,
    meter_repo: Arc<dyn MeterRepository>,
    reading_repo: Arc<dyn ReadingRepository>,
    tariff_repo: Arc<dyn TariffRepository>,
    invoice_repo: Arc<dyn InvoiceRepository>,
    adjustment_repo: Arc<dyn AdjustmentRepository>,
    policy: DeductionPolicy,
}

impl BillingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_repo: Arc<dyn TenantRepository>,
        meter_repo: Arc<dyn MeterRepository>,
        reading_repo: Arc<dyn ReadingRepository>,
        tariff_repo: Arc<dyn TariffRepository>,
        invoice_repo: Arc<dyn InvoiceRepository>,
        adjustment_repo: Arc<dyn AdjustmentRepository>,
        policy: DeductionPolicy,
    ) -> Self {
        Self {
            tenant_repo,
            meter_repo,
            reading_repo,
            tariff_repo,
            invoice_repo,
            adjustment_repo,
            policy,
        }
    }

    /// Generate or update the consolidated invoice for (tenant, period).
    ///
    /// Returns the invoice plus the per-meter breakdown keyed by meter ID;
    /// the breakdown is what the export layer renders, the engine itself
    /// only persists the total. Re-running with unchanged inputs yields the
    /// same amount and no second invoice row.
    pub async fn generate_invoice(
        &self,
        tenant_id: &str,
        period: BillingPeriod,
    ) -> Result<(Invoice, HashMap<String, MeterBillingResult>)> {
        let tenant = self
            .tenant_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| BillingError::TenantNotFound {
                tenant_id: tenant_id.to_string(),
            })?;

        let meters = self.meter_repo.list_for_tenant(&tenant.id).await?;

        // First, bill all meters independently
        let mut results: HashMap<String, MeterBillingResult> = HashMap::new();
        for meter in &meters {
            let result = self.bill_meter(meter, period).await?;
            results.insert(meter.id.clone(), result);
        }

        // Then resolve submeter deductions
        self.policy.apply(&mut results)?;

        let total: Decimal = results.values().map(|r| r.cost).sum();

        // Finally, create or overwrite the invoice for this period
        let invoice = self.invoice_repo.upsert(&tenant.id, period, total).await?;

        info!(
            tenant = %tenant.name,
            period = %period,
            amount = %total,
            meters = results.len(),
            "Generated invoice"
        );

        Ok((invoice, results))
    }

    /// Calculate consumption and cost for a single meter
    async fn bill_meter(
        &self,
        meter: &Meter,
        period: BillingPeriod,
    ) -> Result<MeterBillingResult> {
        let prev_period = period.previous();

        let current = find_for_billing_period(self.reading_repo.as_ref(), &meter.id, period)
            .await?
            .ok_or_else(|| BillingError::MissingReading {
                meter_id: meter.id.clone(),
                meter_name: meter.name.clone(),
                period,
            })?;

        let previous =
            find_for_billing_period(self.reading_repo.as_ref(), &meter.id, prev_period)
                .await?
                .ok_or_else(|| BillingError::MissingReading {
                    meter_id: meter.id.clone(),
                    meter_name: meter.name.clone(),
                    period: prev_period,
                })?;

        let tariff = self
            .tariff_repo
            .find_for_date(&meter.id, period.first_day())
            .await?
            .ok_or_else(|| BillingError::MissingTariff {
                meter_id: meter.id.clone(),
                meter_name: meter.name.clone(),
                period,
            })?;

        let raw_consumption = current.value - previous.value;
        let adjustment = current.manual_adjustment;
        let consumption = self.policy.finalize_consumption(calculations::consumption(
            current.value,
            previous.value,
            adjustment,
        ));
        let cost = calculations::cost(consumption, tariff.rate);

        Ok(MeterBillingResult {
            meter: meter.clone(),
            tariff,
            consumption,
            cost,
            raw_consumption,
            adjustment,
        })
    }

    /// Pre-flight check: every missing fact needed to bill (tenant, period).
    ///
    /// Missing billing data never fails this call — it is the list the
    /// operator sees before attempting a real generation. Only store errors
    /// propagate.
    pub async fn completeness_check(
        &self,
        tenant_id: &str,
        period: BillingPeriod,
    ) -> Result<Vec<CompletenessIssue>> {
        let Some(tenant) = self.tenant_repo.find_by_id(tenant_id).await? else {
            return Ok(vec![CompletenessIssue::UnknownTenant {
                tenant_id: tenant_id.to_string(),
            }]);
        };

        let meters = self.meter_repo.list_for_tenant(&tenant.id).await?;
        let prev_period = period.previous();
        let mut issues = Vec::new();

        for meter in &meters {
            let current =
                find_for_billing_period(self.reading_repo.as_ref(), &meter.id, period).await?;
            if current.is_none() {
                issues.push(CompletenessIssue::MissingReading {
                    meter_id: meter.id.clone(),
                    meter_name: meter.name.clone(),
                    period,
                });
            }

            let previous =
                find_for_billing_period(self.reading_repo.as_ref(), &meter.id, prev_period)
                    .await?;
            if previous.is_none() {
                issues.push(CompletenessIssue::MissingReading {
                    meter_id: meter.id.clone(),
                    meter_name: meter.name.clone(),
                    period: prev_period,
                });
            }

            let tariff = self
                .tariff_repo
                .find_for_date(&meter.id, period.first_day())
                .await?;
            if tariff.is_none() {
                issues.push(CompletenessIssue::MissingTariff {
                    meter_id: meter.id.clone(),
                    meter_name: meter.name.clone(),
                    period,
                });
            }
        }

        Ok(issues)
    }

    /// Append a manual adjustment to an invoice and update its amount
    pub async fn add_adjustment(
        &self,
        invoice_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<Adjustment> {
        let invoice = self
            .invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| BillingError::InvoiceNotFound {
                invoice_id: invoice_id.to_string(),
            })?;

        let adjustment = Adjustment::new(&invoice.id, amount, description)?;
        self.adjustment_repo.create(&adjustment).await?;
        self.invoice_repo.increment_amount(&invoice.id, amount).await?;

        info!(
            invoice = %invoice.id,
            amount = %amount,
            description,
            "Applied adjustment"
        );

        Ok(adjustment)
    }

    /// All adjustments recorded for an invoice, oldest first
    pub async fn list_adjustments(&self, invoice_id: &str) -> Result<Vec<Adjustment>> {
        let invoice = self
            .invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| BillingError::InvoiceNotFound {
                invoice_id: invoice_id.to_string(),
            })?;

        self.adjustment_repo.list_for_invoice(&invoice.id).await
    }

    /// Sum per-meter costs grouped by tariff name, for report breakdowns
    pub fn aggregate_costs_by_tariff(
        results: &HashMap<String, MeterBillingResult>,
    ) -> HashMap<String, Decimal> {
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for result in results.values() {
            *totals.entry(result.tariff.name.clone()).or_default() += result.cost;
        }
        totals
    }
}
