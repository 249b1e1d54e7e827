// End-to-end invoice generation over in-memory stores: simple billing,
// idempotent regeneration, cross-tenant independence, failure propagation,
// and the adjustment ledger.

#[path = "../common/mod.rs"]
mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use common::TestEnv;
use utilibill::billing::{BillingService, DeductionPolicy};
use utilibill::core::{AppError, BillingError, BillingPeriod};
use utilibill::invoices::repositories::InvoiceRepository;

fn july() -> BillingPeriod {
    BillingPeriod::from_ymd(2024, 7).unwrap()
}

fn jan(y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, 1, 1).unwrap()
}

#[tokio::test]
async fn test_generate_invoice_simple_case() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Test Tenant").await;

    let meter = env.add_meter(&tenant, "Office Meter").await;
    env.add_reading(&meter, 2024, 6, dec!(4000)).await;
    env.add_reading(&meter, 2024, 7, dec!(4100)).await;
    env.add_tariff(&meter, dec!(10.5), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::FloorAdjustment);
    let (invoice, results) = service.generate_invoice(&tenant.id, july()).await.unwrap();

    assert_eq!(invoice.tenant_id, tenant.id);
    assert_eq!(invoice.amount, dec!(1050.00));
    assert_eq!(invoice.period, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());

    // The breakdown explains the amount
    let result = &results[&meter.id];
    assert_eq!(result.consumption, dec!(100));
    assert_eq!(result.raw_consumption, dec!(100));
    assert_eq!(result.adjustment, dec!(0));
    assert_eq!(result.tariff.rate, dec!(10.5));

    // And the same amount landed in the store
    let stored = env
        .invoices
        .find_by_tenant_period(&tenant.id, july())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.amount, dec!(1050.00));
}

#[tokio::test]
async fn test_generate_invoice_is_idempotent() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Test Tenant").await;

    let meter = env.add_meter(&tenant, "Office Meter").await;
    env.add_reading(&meter, 2024, 6, dec!(4000)).await;
    env.add_reading(&meter, 2024, 7, dec!(4100)).await;
    env.add_tariff(&meter, dec!(10.5), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::FloorAdjustment);
    let (first, _) = service.generate_invoice(&tenant.id, july()).await.unwrap();
    let (second, _) = service.generate_invoice(&tenant.id, july()).await.unwrap();

    assert_eq!(first.amount, second.amount);
    assert_eq!(first.id, second.id);
    assert_eq!(env.invoices.count(), 1);
}

#[tokio::test]
async fn test_corrected_reading_overwrites_invoice_amount() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Test Tenant").await;

    let meter = env.add_meter(&tenant, "Office Meter").await;
    env.add_reading(&meter, 2024, 6, dec!(4000)).await;
    env.add_reading(&meter, 2024, 7, dec!(4100)).await;
    env.add_tariff(&meter, dec!(10.5), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::FloorAdjustment);
    let (first, _) = service.generate_invoice(&tenant.id, july()).await.unwrap();
    assert_eq!(first.amount, dec!(1050.00));

    // Operator fixes a typo in the July reading and regenerates
    env.add_reading(&meter, 2024, 7, dec!(4200)).await;
    let (second, _) = service.generate_invoice(&tenant.id, july()).await.unwrap();

    assert_eq!(second.amount, dec!(2100.00));
    assert_eq!(env.invoices.count(), 1);
}

#[tokio::test]
async fn test_manual_adjustment_and_sibling_bill_independently() {
    let env = TestEnv::new();
    let landlord = env.add_tenant("Landlord").await;
    let subtenant = env.add_tenant("Sub-tenant").await;

    // Landlord's meter covers the whole building; the sub-let share is
    // excluded through the reading's manual adjustment.
    let main = env.add_meter(&landlord, "Main Building").await;
    env.add_reading(&main, 2024, 6, dec!(2000)).await;
    env.add_adjusted_reading(&main, 2024, 7, dec!(2155), dec!(100)).await;
    env.add_tariff(&main, dec!(40.0), jan(2024)).await;

    let sublet = env.add_meter(&subtenant, "Sub-let Office").await;
    env.add_reading(&sublet, 2024, 6, dec!(4000)).await;
    env.add_reading(&sublet, 2024, 7, dec!(4100)).await;
    env.add_tariff(&sublet, dec!(10.5), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::FloorAdjustment);
    let (landlord_invoice, results) = service
        .generate_invoice(&landlord.id, july())
        .await
        .unwrap();
    let (subtenant_invoice, _) = service
        .generate_invoice(&subtenant.id, july())
        .await
        .unwrap();

    // (2155 - 2000) - 100 = 55 units at 40.0
    assert_eq!(landlord_invoice.amount, dec!(2200.00));
    assert_eq!(results[&main.id].raw_consumption, dec!(155));
    assert_eq!(results[&main.id].adjustment, dec!(100));

    // 100 units at 10.5, untouched by the landlord's adjustment
    assert_eq!(subtenant_invoice.amount, dec!(1050.00));
    assert_eq!(env.invoices.count(), 2);
}

#[tokio::test]
async fn test_missing_reading_aborts_whole_invoice() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Test Tenant").await;

    let complete = env.add_meter(&tenant, "Office").await;
    env.add_reading(&complete, 2024, 6, dec!(100)).await;
    env.add_reading(&complete, 2024, 7, dec!(150)).await;
    env.add_tariff(&complete, dec!(10.0), jan(2024)).await;

    // Second meter has no previous reading
    let incomplete = env.add_meter(&tenant, "Warehouse").await;
    env.add_reading(&incomplete, 2024, 7, dec!(500)).await;
    env.add_tariff(&incomplete, dec!(10.0), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::FloorAdjustment);
    let err = service.generate_invoice(&tenant.id, july()).await.unwrap_err();

    match err {
        AppError::Billing(BillingError::MissingReading {
            meter_name, period, ..
        }) => {
            assert_eq!(meter_name, "Warehouse");
            assert_eq!(period, july().previous());
        }
        other => panic!("expected MissingReading, got {:?}", other),
    }

    // No partial invoice: the complete meter's result was discarded too
    assert_eq!(env.invoices.count(), 0);
}

#[tokio::test]
async fn test_missing_tariff_names_the_meter() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Test Tenant").await;

    let meter = env.add_meter(&tenant, "Office Meter").await;
    env.add_reading(&meter, 2024, 6, dec!(4000)).await;
    env.add_reading(&meter, 2024, 7, dec!(4100)).await;

    let service = env.billing_service(DeductionPolicy::FloorAdjustment);
    let err = service.generate_invoice(&tenant.id, july()).await.unwrap_err();

    match err {
        AppError::Billing(BillingError::MissingTariff { meter_name, .. }) => {
            assert_eq!(meter_name, "Office Meter");
        }
        other => panic!("expected MissingTariff, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_tenant_fails_immediately() {
    let env = TestEnv::new();
    let service = env.billing_service(DeductionPolicy::FloorAdjustment);

    let err = service.generate_invoice("no-such-tenant", july()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Billing(BillingError::TenantNotFound { .. })
    ));
}

#[tokio::test]
async fn test_adjustment_ledger_updates_invoice_amount() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Test Tenant").await;

    let meter = env.add_meter(&tenant, "Office Meter").await;
    env.add_reading(&meter, 2024, 6, dec!(4000)).await;
    env.add_reading(&meter, 2024, 7, dec!(4100)).await;
    env.add_tariff(&meter, dec!(10.5), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::FloorAdjustment);
    let (invoice, _) = service.generate_invoice(&tenant.id, july()).await.unwrap();
    assert_eq!(invoice.amount, dec!(1050.00));

    service
        .add_adjustment(&invoice.id, dec!(50), "correction")
        .await
        .unwrap();

    let adjustments = service.list_adjustments(&invoice.id).await.unwrap();
    assert_eq!(adjustments.len(), 1);
    assert_eq!(adjustments[0].amount, dec!(50));
    assert_eq!(adjustments[0].description, "correction");

    let updated = env.invoices.find_by_id(&invoice.id).await.unwrap().unwrap();
    assert_eq!(updated.amount, dec!(1100.00));

    // Negative corrections are allowed and recorded too
    service
        .add_adjustment(&invoice.id, dec!(-25.50), "overcharge refund")
        .await
        .unwrap();
    let updated = env.invoices.find_by_id(&invoice.id).await.unwrap().unwrap();
    assert_eq!(updated.amount, dec!(1074.50));
    assert_eq!(service.list_adjustments(&invoice.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_adjustment_on_unknown_invoice_fails() {
    let env = TestEnv::new();
    let service = env.billing_service(DeductionPolicy::FloorAdjustment);

    let err = service
        .add_adjustment("no-such-invoice", dec!(50), "correction")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Billing(BillingError::InvoiceNotFound { .. })
    ));
}

#[tokio::test]
async fn test_costs_aggregate_by_tariff_name() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Test Tenant").await;

    let office = env.add_meter(&tenant, "Office").await;
    env.add_reading(&office, 2024, 6, dec!(100)).await;
    env.add_reading(&office, 2024, 7, dec!(200)).await;
    env.add_tariff(&office, dec!(10.0), jan(2024)).await;

    let warehouse = env.add_meter(&tenant, "Warehouse").await;
    env.add_reading(&warehouse, 2024, 6, dec!(0)).await;
    env.add_reading(&warehouse, 2024, 7, dec!(50)).await;
    env.add_tariff(&warehouse, dec!(10.0), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::FloorAdjustment);
    let (_, results) = service.generate_invoice(&tenant.id, july()).await.unwrap();

    let totals = BillingService::aggregate_costs_by_tariff(&results);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals["Standard"], dec!(1500.0));
}
