use emi_core::decimal::compound_factor;
use emi_core::{compute, generate_schedule, validate, InterestModel, LoanInput, LoanParameters};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn worked_example() -> LoanInput {
    LoanInput {
        loan_amount: Some(dec!(10000)),
        down_payment: Some(dec!(1000)),
        tenure_months: Some(24),
        annual_interest_rate_percent: Some(dec!(10)),
        moratorium_months: Some(0),
        interest_model: Some(InterestModel::Reducing),
        processing_fee_percent: Some(dec!(0)),
    }
}

fn params(input: &LoanInput) -> LoanParameters {
    validate(input).unwrap()
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn test_worked_example_reducing() {
    let p = params(&worked_example());
    let result = compute(&p).unwrap();

    assert_eq!(p.principal(), dec!(9000));
    assert!((result.monthly_rate - dec!(0.0083333)).abs() < dec!(0.0000001));
    assert!((result.emi_amount - dec!(415.4)).abs() <= dec!(1));
    // Tolerance follows from ±1 on the EMI over 24 installments
    assert!((result.total_interest - dec!(969.6)).abs() <= dec!(24));
    assert!((result.total_payment - dec!(9969.6)).abs() <= dec!(24));
    assert_eq!(result.schedule.len(), 24);
}

#[test]
fn test_moratorium_increases_burden() {
    let base = compute(&params(&worked_example())).unwrap();

    let mut deferred_input = worked_example();
    deferred_input.moratorium_months = Some(6);
    let deferred = compute(&params(&deferred_input)).unwrap();

    assert!(deferred.adjusted_principal > dec!(9000));
    assert!(deferred.emi_amount > base.emi_amount);
    assert!(deferred.total_interest > base.total_interest);
    assert_eq!(deferred.schedule.len(), 24);
    // 9000 × (1 + 1/120)^6 ≈ 9459.48
    assert!((deferred.adjusted_principal - dec!(9459.48)).abs() < dec!(0.01));
}

#[test]
fn test_moratorium_zero_matches_classic_annuity() {
    let p = params(&worked_example());
    let result = compute(&p).unwrap();

    let r = dec!(10) / dec!(1200);
    let factor = compound_factor(r, 24).unwrap();
    let classic = dec!(9000) * r * factor / (factor - Decimal::ONE);

    assert_eq!(result.adjusted_principal, p.principal());
    assert_eq!(result.emi_amount, classic);
}

#[test]
fn test_flat_rate_exactness() {
    let mut input = worked_example();
    input.interest_model = Some(InterestModel::Flat);
    input.annual_interest_rate_percent = Some(dec!(13.75));
    input.tenure_months = Some(37);
    let p = params(&input);
    let result = compute(&p).unwrap();

    let expected = p.principal() * dec!(13.75) * dec!(37) / dec!(1200);
    assert_eq!(result.total_interest, expected);
    assert!(result.schedule.is_empty());
}

#[test]
fn test_total_identity_with_fee() {
    let mut input = worked_example();
    input.processing_fee_percent = Some(dec!(2.5));
    input.moratorium_months = Some(3);
    let result = compute(&params(&input)).unwrap();

    assert_eq!(result.processing_fee, dec!(225));
    assert_eq!(
        result.total_payment,
        result.principal + result.total_interest + result.processing_fee
    );
}

#[test]
fn test_generate_schedule_matches_compute() {
    let mut input = worked_example();
    input.moratorium_months = Some(4);
    let p = params(&input);
    let result = compute(&p).unwrap();
    let schedule = generate_schedule(&p, result.emi_amount).unwrap();
    assert_eq!(schedule, result.schedule);
}

#[test]
fn test_largest_loan_longest_tenure() {
    let input = LoanInput {
        loan_amount: Some(dec!(10000000)),
        down_payment: Some(dec!(0)),
        tenure_months: Some(120),
        annual_interest_rate_percent: Some(dec!(35)),
        moratorium_months: Some(119),
        interest_model: Some(InterestModel::Reducing),
        processing_fee_percent: Some(dec!(5)),
    };
    let result = compute(&params(&input)).unwrap();
    assert_eq!(result.repayment_tenure, 1);
    assert_eq!(result.schedule.len(), 120);
    let last = result.schedule.last().unwrap();
    assert!(last.remaining_balance.abs() < dec!(0.01));
}

// ===========================================================================
// Properties over valid inputs
// ===========================================================================

fn valid_input() -> impl Strategy<Value = LoanInput> {
    (
        1_000u64..=10_000_000,
        0u32..=99,
        6i64..=120,
        100u32..=3_500,
        0u32..=100,
        any::<bool>(),
        0u32..=500,
    )
        .prop_map(|(amount, down_pct, tenure, rate_bp, mor_pct, flat, fee_bp)| {
            let loan_amount = Decimal::from(amount);
            let down_payment = loan_amount * Decimal::from(down_pct) / dec!(100);
            let moratorium = (tenure - 1) * i64::from(mor_pct) / 100;
            LoanInput {
                loan_amount: Some(loan_amount),
                down_payment: Some(down_payment),
                tenure_months: Some(tenure),
                annual_interest_rate_percent: Some(Decimal::new(i64::from(rate_bp), 2)),
                moratorium_months: Some(moratorium),
                interest_model: Some(if flat {
                    InterestModel::Flat
                } else {
                    InterestModel::Reducing
                }),
                processing_fee_percent: Some(Decimal::new(i64::from(fee_bp), 2)),
            }
        })
}

proptest! {
    #[test]
    fn prop_compute_is_idempotent(input in valid_input()) {
        let p = validate(&input).unwrap();
        prop_assert_eq!(compute(&p).unwrap(), compute(&p).unwrap());
    }

    #[test]
    fn prop_total_identity(input in valid_input()) {
        let result = compute(&validate(&input).unwrap()).unwrap();
        prop_assert_eq!(
            result.total_payment,
            result.principal + result.total_interest + result.processing_fee
        );
    }

    #[test]
    fn prop_principal_is_conserved(input in valid_input()) {
        let p = validate(&input).unwrap();
        let result = compute(&p).unwrap();
        if p.interest_model() == InterestModel::Reducing {
            let repaid: Decimal = result.schedule.iter().map(|e| e.principal_paid).sum();
            let tolerance = Decimal::from(p.tenure_months()) * dec!(0.01);
            prop_assert!((repaid - result.adjusted_principal).abs() <= tolerance);
            prop_assert_eq!(result.schedule.len(), p.tenure_months() as usize);
        } else {
            prop_assert!(result.schedule.is_empty());
        }
    }
}
