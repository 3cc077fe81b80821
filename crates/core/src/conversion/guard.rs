//! Arithmetic guards shared by every converter.
//!
//! A rate of zero means "not entered yet". Any formula that would divide by it
//! yields zero instead of failing, so half-filled forms never show garbage.
//! Products that overflow are zeroed the same way.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Divides `numerator` by `divisor`, returning zero when the divisor is zero.
///
/// Also returns zero if the quotient would overflow.
#[must_use]
pub fn safe_div(numerator: Decimal, divisor: Decimal) -> Decimal {
    if divisor.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(divisor).unwrap_or(Decimal::ZERO)
}

/// Multiplies `value` by `factor`, returning zero if the product would overflow.
#[must_use]
pub fn safe_mul(value: Decimal, factor: Decimal) -> Decimal {
    value.checked_mul(factor).unwrap_or(Decimal::ZERO)
}

/// Multiplier for a percentage markup: `1 + percent / 100`.
#[must_use]
pub fn markup_factor(percent: Decimal) -> Decimal {
    Decimal::ONE + percent / HUNDRED
}

/// `amount * percent / 100`.
#[must_use]
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    safe_mul(amount, percent) / HUNDRED
}

/// Rounds for display using Banker's Rounding.
#[must_use]
pub fn round_display(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}
