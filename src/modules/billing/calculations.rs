//! Pure calculation primitives. No state, no I/O, exact decimal arithmetic.

use rust_decimal::Decimal;

/// Consumption between two meter readings, minus an adjustment.
///
/// A current value below the previous one is read as a meter replacement or
/// reset and yields zero rather than an error; callers that need the raw
/// delta compute `current - previous` themselves. The result may be negative
/// when the adjustment exceeds the raw delta — the active deduction policy
/// decides whether that is floored or surfaced.
pub fn consumption(current: Decimal, previous: Decimal, adjustment: Decimal) -> Decimal {
    if current < previous {
        return Decimal::ZERO;
    }

    (current - previous) - adjustment
}

/// Monetary cost of a consumption at a tariff rate.
///
/// Exact multiplication, no rounding: display formatting belongs to the
/// export layer.
pub fn cost(consumption: Decimal, rate: Decimal) -> Decimal {
    consumption * rate
}
