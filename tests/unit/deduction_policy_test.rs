// Deduction policy behavior, driven through the full billing service with
// in-memory stores: strict subtraction (sum children first, fail on negative
// remainder) versus floor adjustment (clamp at zero, no cross-meter pass).

#[path = "../common/mod.rs"]
mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use common::TestEnv;
use utilibill::billing::DeductionPolicy;
use utilibill::core::{AppError, BillingError, BillingPeriod};

fn july() -> BillingPeriod {
    BillingPeriod::from_ymd(2024, 7).unwrap()
}

fn jan(y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, 1, 1).unwrap()
}

#[tokio::test]
async fn test_strict_subtraction_recomputes_parent_at_parent_rate() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Landlord").await;

    let parent = env.add_meter(&tenant, "Main Building").await;
    env.add_reading(&parent, 2024, 6, dec!(2000)).await;
    env.add_reading(&parent, 2024, 7, dec!(2100)).await;
    env.add_tariff(&parent, dec!(40.0), jan(2024)).await;

    let child = env.add_submeter(&tenant, "Sub-let Office", &parent).await;
    env.add_reading(&child, 2024, 6, dec!(4000)).await;
    env.add_reading(&child, 2024, 7, dec!(4100)).await;
    env.add_tariff(&child, dec!(10.5), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::StrictSubtraction);
    let (invoice, results) = service.generate_invoice(&tenant.id, july()).await.unwrap();

    // Parent: 100 - 100 = 0 at rate 40; child keeps its own 100 * 10.5
    let parent_result = &results[&parent.id];
    assert_eq!(parent_result.consumption, dec!(0));
    assert_eq!(parent_result.cost, dec!(0.0));

    let child_result = &results[&child.id];
    assert_eq!(child_result.consumption, dec!(100));
    assert_eq!(child_result.cost, dec!(1050.0));

    assert_eq!(invoice.amount, dec!(1050.0));
}

#[tokio::test]
async fn test_strict_subtraction_fails_when_children_exceed_parent() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Landlord").await;

    let parent = env.add_meter(&tenant, "Main Building").await;
    env.add_reading(&parent, 2024, 6, dec!(2000)).await;
    env.add_reading(&parent, 2024, 7, dec!(2050)).await;
    env.add_tariff(&parent, dec!(40.0), jan(2024)).await;

    let child = env.add_submeter(&tenant, "Sub-let Office", &parent).await;
    env.add_reading(&child, 2024, 6, dec!(4000)).await;
    env.add_reading(&child, 2024, 7, dec!(4100)).await;
    env.add_tariff(&child, dec!(10.5), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::StrictSubtraction);
    let err = service.generate_invoice(&tenant.id, july()).await.unwrap_err();

    match err {
        AppError::Billing(BillingError::SubmeterExceedsParent {
            parent_name,
            parent_consumption,
            children_total,
            ..
        }) => {
            assert_eq!(parent_name, "Main Building");
            assert_eq!(parent_consumption, dec!(50));
            assert_eq!(children_total, dec!(100));
        }
        other => panic!("expected SubmeterExceedsParent, got {:?}", other),
    }

    // No partial invoice was written
    assert_eq!(env.invoices.count(), 0);
}

#[tokio::test]
async fn test_strict_subtraction_sums_all_children_before_subtracting() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Landlord").await;

    let parent = env.add_meter(&tenant, "Main Building").await;
    env.add_reading(&parent, 2024, 6, dec!(0)).await;
    env.add_reading(&parent, 2024, 7, dec!(100)).await;
    env.add_tariff(&parent, dec!(40.0), jan(2024)).await;

    // First child overshoots the parent on its own...
    let big = env.add_submeter(&tenant, "Annex A", &parent).await;
    env.add_reading(&big, 2024, 6, dec!(0)).await;
    env.add_reading(&big, 2024, 7, dec!(150)).await;
    env.add_tariff(&big, dec!(10.0), jan(2024)).await;

    // ...but the second carries a negative post-adjustment consumption that
    // brings the combined deduction back under the parent's total.
    let corrected = env.add_submeter(&tenant, "Annex B", &parent).await;
    env.add_adjusted_reading(&corrected, 2024, 6, dec!(0), dec!(0)).await;
    env.add_adjusted_reading(&corrected, 2024, 7, dec!(0), dec!(60)).await;
    env.add_tariff(&corrected, dec!(10.0), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::StrictSubtraction);
    let (_, results) = service.generate_invoice(&tenant.id, july()).await.unwrap();

    // Children sum to 150 + (-60) = 90, so the parent keeps 10 units. A
    // one-at-a-time subtraction would have failed on the first child.
    assert_eq!(results[&parent.id].consumption, dec!(10));
    assert_eq!(results[&parent.id].cost, dec!(400.0));
}

#[tokio::test]
async fn test_floor_adjustment_clamps_negative_consumption_to_zero() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Tenant").await;

    let meter = env.add_meter(&tenant, "Office").await;
    env.add_adjusted_reading(&meter, 2024, 6, dec!(1000), dec!(0)).await;
    // Adjustment exceeds the raw delta of 50
    env.add_adjusted_reading(&meter, 2024, 7, dec!(1050), dec!(80)).await;
    env.add_tariff(&meter, dec!(10.0), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::FloorAdjustment);
    let (invoice, results) = service.generate_invoice(&tenant.id, july()).await.unwrap();

    let result = &results[&meter.id];
    assert_eq!(result.consumption, dec!(0));
    assert_eq!(result.cost, dec!(0.0));
    // Raw delta is reported unfloored for downstream explanation
    assert_eq!(result.raw_consumption, dec!(50));
    assert_eq!(result.adjustment, dec!(80));

    assert_eq!(invoice.amount, dec!(0.0));
}

#[tokio::test]
async fn test_floor_adjustment_ignores_subtract_from_links() {
    let env = TestEnv::new();
    let tenant = env.add_tenant("Landlord").await;

    let parent = env.add_meter(&tenant, "Main Building").await;
    env.add_reading(&parent, 2024, 6, dec!(2000)).await;
    env.add_reading(&parent, 2024, 7, dec!(2100)).await;
    env.add_tariff(&parent, dec!(40.0), jan(2024)).await;

    let child = env.add_submeter(&tenant, "Sub-let Office", &parent).await;
    env.add_reading(&child, 2024, 6, dec!(4000)).await;
    env.add_reading(&child, 2024, 7, dec!(4100)).await;
    env.add_tariff(&child, dec!(10.5), jan(2024)).await;

    let service = env.billing_service(DeductionPolicy::FloorAdjustment);
    let (invoice, results) = service.generate_invoice(&tenant.id, july()).await.unwrap();

    // No cross-meter pass: both meters bill independently
    assert_eq!(results[&parent.id].cost, dec!(4000.0));
    assert_eq!(results[&child.id].cost, dec!(1050.0));
    assert_eq!(invoice.amount, dec!(5050.0));
}

#[test]
fn test_policy_parses_from_config_strings() {
    assert_eq!(
        "strict_subtraction".parse::<DeductionPolicy>().unwrap(),
        DeductionPolicy::StrictSubtraction
    );
    assert_eq!(
        "floor_adjustment".parse::<DeductionPolicy>().unwrap(),
        DeductionPolicy::FloorAdjustment
    );
    assert!("clamp".parse::<DeductionPolicy>().is_err());
}
