//! Nightly billing batch: generates invoices for every tenant for the
//! current period. Intended to run from cron; per-tenant failures are logged
//! and never abort the run.

use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use utilibill::billing::services::BillingService;
use utilibill::config::Config;
use utilibill::core::BillingPeriod;
use utilibill::invoices::{MySqlAdjustmentRepository, MySqlInvoiceRepository};
use utilibill::meters::MySqlMeterRepository;
use utilibill::readings::MySqlReadingRepository;
use utilibill::reports::SummaryService;
use utilibill::tariffs::MySqlTariffRepository;
use utilibill::tenants::MySqlTenantRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "utilibill=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Utilibill nightly billing");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Deduction policy: {}", config.billing.deduction_policy);

    // Create database connection pool and apply schema
    let pool = config.database.create_pool().await?;
    config.database.run_migrations(&pool).await?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let tenant_repo = Arc::new(MySqlTenantRepository::new(pool.clone()));
    let billing = Arc::new(BillingService::new(
        tenant_repo.clone(),
        Arc::new(MySqlMeterRepository::new(pool.clone())),
        Arc::new(MySqlReadingRepository::new(pool.clone())),
        Arc::new(MySqlTariffRepository::new(pool.clone())),
        Arc::new(MySqlInvoiceRepository::new(pool.clone())),
        Arc::new(MySqlAdjustmentRepository::new(pool.clone())),
        config.billing.deduction_policy,
    ));
    let summary = SummaryService::new(tenant_repo, billing);

    let period = BillingPeriod::new(Utc::now().date_naive());
    let outcome = summary.run_nightly(period).await?;

    tracing::info!(
        "Nightly billing finished: {} generated, {} failed",
        outcome.generated,
        outcome.failed
    );

    Ok(())
}
