use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{checked_add, checked_mul, checked_sub};
use crate::error::ComputationError;
use crate::types::{InterestModel, Money};
use crate::validation::LoanParameters;

/// One month of the amortization ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub month: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub remaining_balance: Money,
}

/// Month-by-month breakdown of a reducing-balance loan paying `emi` after
/// the moratorium.
///
/// Moratorium months pay no principal and add their interest to the balance.
/// Flat-rate loans have no schedule and yield an empty vector. The last
/// `remaining_balance` is whatever the recurrence leaves; it is not swept to
/// zero.
pub fn generate_schedule(
    params: &LoanParameters,
    emi: Money,
) -> Result<Vec<AmortizationEntry>, ComputationError> {
    if params.interest_model() == InterestModel::Flat {
        return Ok(Vec::new());
    }

    let monthly_rate = params.monthly_rate()?;
    let moratorium = params.moratorium_months();
    let mut balance = params.principal();
    let mut entries = Vec::with_capacity(params.tenure_months() as usize);

    for month in 1..=params.tenure_months() {
        let interest = checked_mul(balance, monthly_rate, "schedule interest")?;

        let principal_paid = if month <= moratorium {
            balance = checked_add(balance, interest, "schedule balance")?;
            Decimal::ZERO
        } else {
            let principal_paid = checked_sub(emi, interest, "schedule principal")?;
            balance = checked_sub(balance, principal_paid, "schedule balance")?;
            principal_paid
        };

        entries.push(AmortizationEntry {
            month,
            principal_paid,
            interest_paid: interest,
            remaining_balance: balance,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::engine::compute;
    use crate::validation::{validate, LoanInput};
    use rust_decimal_macros::dec;

    fn loan(moratorium: i64, model: InterestModel) -> LoanParameters {
        validate(&LoanInput {
            loan_amount: Some(dec!(120000)),
            down_payment: Some(dec!(20000)),
            tenure_months: Some(12),
            annual_interest_rate_percent: Some(dec!(12)),
            moratorium_months: Some(moratorium),
            interest_model: Some(model),
            processing_fee_percent: None,
        })
        .unwrap()
    }

    #[test]
    fn test_schedule_length_and_months() {
        let params = loan(0, InterestModel::Reducing);
        let result = compute(&params).unwrap();
        let months: Vec<u32> = result.schedule.iter().map(|e| e.month).collect();
        assert_eq!(months, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_first_month_split() {
        let params = loan(0, InterestModel::Reducing);
        let result = compute(&params).unwrap();
        let first = &result.schedule[0];
        // 100000 at 1% per month
        assert_eq!(first.interest_paid, dec!(1000));
        assert_eq!(first.principal_paid, result.emi_amount - dec!(1000));
        assert_eq!(first.remaining_balance, dec!(100000) - first.principal_paid);
    }

    #[test]
    fn test_balance_runs_down_to_zero() {
        let params = loan(0, InterestModel::Reducing);
        let result = compute(&params).unwrap();
        let last = result.schedule.last().unwrap();
        assert!(last.remaining_balance.abs() < dec!(0.01));
        for pair in result.schedule.windows(2) {
            assert!(pair[1].remaining_balance < pair[0].remaining_balance);
        }
    }

    #[test]
    fn test_moratorium_rows_capitalise() {
        let params = loan(3, InterestModel::Reducing);
        let result = compute(&params).unwrap();
        let rows = &result.schedule;

        assert_eq!(rows[0].principal_paid, Decimal::ZERO);
        assert_eq!(rows[0].interest_paid, dec!(1000));
        assert_eq!(rows[0].remaining_balance, dec!(101000));
        assert_eq!(rows[1].remaining_balance, dec!(102010));
        assert_eq!(rows[2].remaining_balance, result.adjusted_principal);
        assert!(rows[3].principal_paid > Decimal::ZERO);
    }

    #[test]
    fn test_flat_has_no_schedule() {
        let params = loan(0, InterestModel::Flat);
        assert!(generate_schedule(&params, dec!(9000)).unwrap().is_empty());
    }

    #[test]
    fn test_schedule_is_restartable() {
        let params = loan(2, InterestModel::Reducing);
        let emi = compute(&params).unwrap().emi_amount;
        let first = generate_schedule(&params, emi).unwrap();
        let second = generate_schedule(&params, emi).unwrap();
        assert_eq!(first, second);
    }
}
