//! Monetary amount helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` rounded to two decimal places
//! wherever they become observable (persisted shares, aggregated totals,
//! settlement amounts).

use rust_decimal::Decimal;

/// Number of decimal places for all monetary amounts.
pub const SCALE: u32 = 2;

/// Tolerance band for "settled" balances.
///
/// A net balance within ±0.01 is treated as zero; it absorbs the rounding
/// noise of repeated two-decimal additions.
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, SCALE);

/// Rounds an amount to the monetary scale (banker's rounding).
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp(SCALE)
}

/// Returns true if a net balance is within the settled tolerance band.
#[must_use]
pub fn is_settled(net: Decimal) -> bool {
    net.abs() <= EPSILON
}
