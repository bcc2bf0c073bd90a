//! Checked decimal arithmetic for money and rates.
//!
//! Every helper here returns a [`ComputationError`] naming the calling context
//! instead of panicking on overflow or a zero divisor. Nothing in this module
//! rounds: full precision is carried through the engine and only
//! [`round_money`] cuts it down, at the display boundary.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::ComputationError;
use crate::types::{Money, Percent, Rate};

/// Percent-per-year to rate-per-month divisor (12 months × 100).
pub const MONTHLY_PERCENT_DIVISOR: Decimal = dec!(1200);

pub const HUNDRED: Decimal = dec!(100);

/// Decimal places shown for currency.
pub const MONEY_DP: u32 = 2;

pub fn checked_add(a: Decimal, b: Decimal, context: &str) -> Result<Decimal, ComputationError> {
    a.checked_add(b).ok_or_else(|| overflow(context))
}

pub fn checked_sub(a: Decimal, b: Decimal, context: &str) -> Result<Decimal, ComputationError> {
    a.checked_sub(b).ok_or_else(|| overflow(context))
}

pub fn checked_mul(a: Decimal, b: Decimal, context: &str) -> Result<Decimal, ComputationError> {
    a.checked_mul(b).ok_or_else(|| overflow(context))
}

pub fn checked_div(
    numerator: Decimal,
    denominator: Decimal,
    context: &str,
) -> Result<Decimal, ComputationError> {
    if denominator.is_zero() {
        return Err(ComputationError::DivisionByZero {
            context: context.to_string(),
        });
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| overflow(context))
}

/// `(1 + rate)^periods`, by repeated exact multiplication.
pub fn compound_factor(rate: Rate, periods: u32) -> Result<Decimal, ComputationError> {
    let base = checked_add(Decimal::ONE, rate, "compound factor base")?;
    base.checked_powu(u64::from(periods))
        .ok_or_else(|| overflow("compound factor"))
}

/// Annual percentage (e.g. 10 for 10%) to a monthly rate (0.00833…).
pub fn monthly_rate(annual_percent: Percent) -> Result<Rate, ComputationError> {
    checked_div(annual_percent, MONTHLY_PERCENT_DIVISOR, "monthly rate")
}

/// `amount × percent / 100`.
pub fn percent_of(amount: Money, percent: Percent, context: &str) -> Result<Money, ComputationError> {
    checked_div(checked_mul(amount, percent, context)?, HUNDRED, context)
}

/// Round to currency precision. Only for values leaving the engine.
pub fn round_money(value: Money) -> Money {
    value.round_dp(MONEY_DP)
}

fn overflow(context: &str) -> ComputationError {
    ComputationError::Overflow {
        context: context.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_div_by_zero() {
        let err = checked_div(dec!(1), Decimal::ZERO, "annuity denominator").unwrap_err();
        assert_eq!(
            err,
            ComputationError::DivisionByZero {
                context: "annuity denominator".into()
            }
        );
    }

    #[test]
    fn test_checked_mul_overflow() {
        let err = checked_mul(Decimal::MAX, dec!(2), "balance").unwrap_err();
        assert!(matches!(err, ComputationError::Overflow { .. }));
    }

    #[test]
    fn test_compound_factor_exact() {
        // 1.1^3 = 1.331 exactly
        assert_eq!(compound_factor(dec!(0.1), 3).unwrap(), dec!(1.331));
        assert_eq!(compound_factor(dec!(0.05), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_zero_rate_annuity_denominator_is_guarded() {
        let factor = compound_factor(Decimal::ZERO, 24).unwrap();
        let denom = factor - Decimal::ONE;
        assert!(checked_div(dec!(75), denom, "annuity denominator").is_err());
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)).unwrap(), dec!(0.01));
        let r = monthly_rate(dec!(10)).unwrap();
        assert!((r - dec!(0.0083333)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(9000), dec!(2), "fee").unwrap(), dec!(180));
    }

    #[test]
    fn test_round_money_bankers() {
        assert_eq!(round_money(dec!(415.305)), dec!(415.30));
        assert_eq!(round_money(dec!(415.315)), dec!(415.32));
        assert_eq!(round_money(dec!(415.3051)), dec!(415.31));
    }
}
