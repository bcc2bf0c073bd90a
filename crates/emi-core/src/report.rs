//! Display-ready views over an [`AmortizationResult`].
//!
//! Everything here rounds to currency precision; the engine itself never
//! does. [`analyse_loan`] runs the whole pipeline from raw form input and
//! wraps the outcome in the standard [`ComputationOutput`] envelope.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{compute, AmortizationEntry, AmortizationResult};
use crate::decimal::{round_money, HUNDRED};
#[cfg(feature = "comparison")]
use crate::error::ComputationError;
use crate::types::{with_metadata, ComputationOutput, InterestModel, Money, Percent, Rate};
use crate::validation::{validate_form, LoanForm, LoanLimits, LoanParameters};
use crate::EmiResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Residual balance at or above which a warning is raised.
const RESIDUAL_WARNING_THRESHOLD: Decimal = dec!(0.01);

/// Headline figures rounded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub interest_model: InterestModel,
    pub principal: Money,
    pub adjusted_principal: Money,
    pub emi_amount: Money,
    pub total_interest: Money,
    pub moratorium_interest: Money,
    pub processing_fee: Money,
    pub total_payment: Money,
    pub tenure_months: u32,
    pub moratorium_months: u32,
    pub repayment_tenure: u32,
    /// Monthly rate, not rounded to currency precision.
    pub monthly_rate: Rate,
    pub composition: PaymentComposition,
}

/// Share of the total payment going to each component, in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentComposition {
    pub principal_pct: Percent,
    pub interest_pct: Percent,
    pub processing_fee_pct: Percent,
}

/// Twelve-month roll-up of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleYear {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

/// Reducing-balance and flat-rate results for the same loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub reducing: AmortizationResult,
    pub flat: AmortizationResult,
    /// flat.total_interest − reducing.total_interest
    pub interest_difference: Money,
    /// flat.emi_amount − reducing.emi_amount. Per installment only: the flat
    /// EMI runs for the whole tenure while the reducing EMI starts after the
    /// moratorium, so with a moratorium the two cover different month counts.
    pub emi_difference: Money,
}

/// Everything a loan calculator screen shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanReport {
    pub summary: LoanSummary,
    pub schedule: Vec<AmortizationEntry>,
}

impl LoanSummary {
    pub fn from_result(params: &LoanParameters, result: &AmortizationResult) -> Self {
        Self {
            interest_model: result.interest_model,
            principal: round_money(result.principal),
            adjusted_principal: round_money(result.adjusted_principal),
            emi_amount: round_money(result.emi_amount),
            total_interest: round_money(result.total_interest),
            moratorium_interest: round_money(result.moratorium_interest),
            processing_fee: round_money(result.processing_fee),
            total_payment: round_money(result.total_payment),
            tenure_months: params.tenure_months(),
            moratorium_months: params.moratorium_months(),
            repayment_tenure: result.repayment_tenure,
            monthly_rate: result.monthly_rate,
            composition: PaymentComposition::from_result(result),
        }
    }
}

impl ScheduleYear {
    /// Copy with money columns rounded for display.
    pub fn rounded(&self) -> Self {
        Self {
            year: self.year,
            principal_paid: round_money(self.principal_paid),
            interest_paid: round_money(self.interest_paid),
            closing_balance: round_money(self.closing_balance),
        }
    }
}

impl PaymentComposition {
    pub fn from_result(result: &AmortizationResult) -> Self {
        let share = |part: Money| -> Percent {
            if result.total_payment.is_zero() {
                Decimal::ZERO
            } else {
                (part / result.total_payment * HUNDRED).round_dp(2)
            }
        };
        Self {
            principal_pct: share(result.principal),
            interest_pct: share(result.total_interest),
            processing_fee_pct: share(result.processing_fee),
        }
    }
}

/// Round every money column of a schedule for display.
pub fn round_schedule(schedule: &[AmortizationEntry]) -> Vec<AmortizationEntry> {
    schedule
        .iter()
        .map(|e| AmortizationEntry {
            month: e.month,
            principal_paid: round_money(e.principal_paid),
            interest_paid: round_money(e.interest_paid),
            remaining_balance: round_money(e.remaining_balance),
        })
        .collect()
}

/// Group schedule rows into loan years (months 1–12 are year 1). A trailing
/// partial year forms its own bucket. Sums are exact; round for display.
pub fn yearly_breakdown(schedule: &[AmortizationEntry]) -> Vec<ScheduleYear> {
    let mut years: Vec<ScheduleYear> = Vec::new();

    for entry in schedule {
        let year = entry.month.saturating_sub(1) / MONTHS_PER_YEAR + 1;
        match years.last_mut() {
            Some(current) if current.year == year => {
                current.principal_paid += entry.principal_paid;
                current.interest_paid += entry.interest_paid;
                current.closing_balance = entry.remaining_balance;
            }
            _ => years.push(ScheduleYear {
                year,
                principal_paid: entry.principal_paid,
                interest_paid: entry.interest_paid,
                closing_balance: entry.remaining_balance,
            }),
        }
    }

    years
}

/// Compute the loan under both interest models.
#[cfg(feature = "comparison")]
pub fn compare_models(params: &LoanParameters) -> Result<ModelComparison, ComputationError> {
    let reducing = compute(&params.with_model(InterestModel::Reducing))?;
    let flat = compute(&params.with_model(InterestModel::Flat))?;

    Ok(ModelComparison {
        interest_difference: flat.total_interest - reducing.total_interest,
        emi_difference: flat.emi_amount - reducing.emi_amount,
        reducing,
        flat,
    })
}

/// Validate a submitted form, compute, and wrap the rounded report with
/// warnings and metadata.
pub fn analyse_loan(
    form: &LoanForm,
    limits: &LoanLimits,
) -> EmiResult<ComputationOutput<LoanReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let params = validate_form(form, limits)?;
    let result = compute(&params)?;

    match params.interest_model() {
        InterestModel::Flat if params.moratorium_months() > 0 => {
            warnings.push(format!(
                "Moratorium of {} months is ignored under the flat interest model",
                params.moratorium_months()
            ));
        }
        InterestModel::Flat => {}
        InterestModel::Reducing => {
            if let Some(last) = result.schedule.last() {
                if last.remaining_balance.abs() >= RESIDUAL_WARNING_THRESHOLD {
                    warnings.push(format!(
                        "Final installment leaves a residual balance of {}",
                        round_money(last.remaining_balance)
                    ));
                }
            }
        }
    }

    let report = LoanReport {
        summary: LoanSummary::from_result(&params, &result),
        schedule: round_schedule(&result.schedule),
    };

    let methodology = match params.interest_model() {
        InterestModel::Reducing => "Reducing-balance EMI (annuity) with moratorium capitalisation",
        InterestModel::Flat => "Flat-rate EMI on original principal",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "principal": params.principal().to_string(),
            "annual_interest_rate_percent": params.annual_interest_rate_percent().to_string(),
            "tenure_months": params.tenure_months(),
            "moratorium_months": params.moratorium_months(),
            "interest_model": params.interest_model(),
            "processing_fee_percent": params.processing_fee_percent().to_string(),
        }),
        warnings,
        elapsed,
        report,
    ))
}
