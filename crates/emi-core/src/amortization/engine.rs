//! EMI, total interest and total payment for a validated loan.
//!
//! Reducing-balance loans capitalise moratorium interest into the balance and
//! then solve the annuity for the remaining months. Flat-rate loans charge
//! interest once on the original principal and ignore the moratorium.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amortization::schedule::{generate_schedule, AmortizationEntry};
use crate::decimal::{
    checked_add, checked_div, checked_mul, checked_sub, compound_factor, percent_of,
    MONTHLY_PERCENT_DIVISOR,
};
use crate::error::ComputationError;
use crate::types::{InterestModel, Money, Rate};
use crate::validation::LoanParameters;

/// Full-precision result of one computation. Round with
/// [`crate::report::LoanSummary`] before display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub interest_model: InterestModel,
    /// Installment paid in each repayment month.
    pub emi_amount: Money,
    pub total_interest: Money,
    /// principal + total_interest + processing_fee
    pub total_payment: Money,
    pub principal: Money,
    /// Balance after moratorium capitalisation; equals `principal` for
    /// flat-rate loans and when there is no moratorium.
    pub adjusted_principal: Money,
    pub moratorium_interest: Money,
    pub processing_fee: Money,
    pub monthly_rate: Rate,
    pub repayment_tenure: u32,
    /// Month-by-month ledger. Empty for flat-rate loans.
    pub schedule: Vec<AmortizationEntry>,
}

/// Interest-side figures produced by one interest model.
struct ModelOutcome {
    emi: Money,
    total_interest: Money,
    adjusted_principal: Money,
}

/// Compute EMI, totals and (for reducing balance) the schedule.
pub fn compute(params: &LoanParameters) -> Result<AmortizationResult, ComputationError> {
    let repayment_tenure = repayment_tenure(params)?;
    let principal = params.principal();
    let monthly_rate = params.monthly_rate()?;

    let outcome = match params.interest_model() {
        InterestModel::Reducing => reducing_balance(params, monthly_rate, repayment_tenure)?,
        InterestModel::Flat => flat_rate(params)?,
    };

    let processing_fee = percent_of(
        principal,
        params.processing_fee_percent(),
        "processing fee",
    )?;
    let total_payment = checked_add(
        checked_add(principal, outcome.total_interest, "total payment")?,
        processing_fee,
        "total payment",
    )?;

    let schedule = match params.interest_model() {
        InterestModel::Reducing => generate_schedule(params, outcome.emi)?,
        InterestModel::Flat => Vec::new(),
    };

    debug!(
        model = params.interest_model().label(),
        tenure = params.tenure_months(),
        moratorium = params.moratorium_months(),
        emi = %outcome.emi,
        total_interest = %outcome.total_interest,
        "amortization computed"
    );

    Ok(AmortizationResult {
        interest_model: params.interest_model(),
        emi_amount: outcome.emi,
        total_interest: outcome.total_interest,
        total_payment,
        principal,
        adjusted_principal: outcome.adjusted_principal,
        moratorium_interest: checked_sub(
            outcome.adjusted_principal,
            principal,
            "moratorium interest",
        )?,
        processing_fee,
        monthly_rate,
        repayment_tenure,
        schedule,
    })
}

/// Balance after `months` of interest being added to principal.
pub(crate) fn capitalise(
    principal: Money,
    monthly_rate: Rate,
    months: u32,
) -> Result<Money, ComputationError> {
    let mut balance = principal;
    for _ in 0..months {
        let interest = checked_mul(balance, monthly_rate, "moratorium interest")?;
        balance = checked_add(balance, interest, "moratorium balance")?;
    }
    Ok(balance)
}

/// Standard annuity payment: `P·r·(1+r)^n / ((1+r)^n − 1)`.
pub(crate) fn annuity_payment(
    principal: Money,
    monthly_rate: Rate,
    periods: u32,
) -> Result<Money, ComputationError> {
    let factor = compound_factor(monthly_rate, periods)?;
    let numerator = checked_mul(
        checked_mul(principal, monthly_rate, "EMI numerator")?,
        factor,
        "EMI numerator",
    )?;
    let denominator = checked_sub(factor, Decimal::ONE, "EMI denominator")?;
    checked_div(numerator, denominator, "EMI annuity denominator")
}

fn reducing_balance(
    params: &LoanParameters,
    monthly_rate: Rate,
    repayment_tenure: u32,
) -> Result<ModelOutcome, ComputationError> {
    let principal = params.principal();
    let adjusted_principal = capitalise(principal, monthly_rate, params.moratorium_months())?;
    let emi = annuity_payment(adjusted_principal, monthly_rate, repayment_tenure)?;

    let moratorium_interest = checked_sub(adjusted_principal, principal, "moratorium interest")?;
    let repaid = checked_mul(emi, Decimal::from(repayment_tenure), "total repaid")?;
    let repayment_interest = checked_sub(repaid, adjusted_principal, "repayment interest")?;

    Ok(ModelOutcome {
        emi,
        total_interest: checked_add(moratorium_interest, repayment_interest, "total interest")?,
        adjusted_principal,
    })
}

fn flat_rate(params: &LoanParameters) -> Result<ModelOutcome, ComputationError> {
    let principal = params.principal();
    let tenure = Decimal::from(params.tenure_months());

    let total_interest = checked_div(
        checked_mul(
            checked_mul(principal, params.annual_interest_rate_percent(), "flat interest")?,
            tenure,
            "flat interest",
        )?,
        MONTHLY_PERCENT_DIVISOR,
        "flat interest",
    )?;
    let emi = checked_div(
        checked_add(principal, total_interest, "flat EMI")?,
        tenure,
        "flat EMI",
    )?;

    Ok(ModelOutcome {
        emi,
        total_interest,
        adjusted_principal: principal,
    })
}

fn repayment_tenure(params: &LoanParameters) -> Result<u32, ComputationError> {
    match u32::try_from(params.repayment_tenure()) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ComputationError::InvalidRepaymentTenure {
            tenure: params.tenure_months(),
            moratorium: params.moratorium_months(),
        }),
    }
}
