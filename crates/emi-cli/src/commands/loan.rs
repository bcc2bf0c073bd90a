use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Instant;

use emi_core::calendar::date_schedule;
use emi_core::decimal::round_money;
use emi_core::report::{
    analyse_loan, compare_models, round_schedule, yearly_breakdown, LoanSummary,
};
use emi_core::{
    compute, validate_form, with_metadata, EmiError, InterestModel, LoanForm, LoanInput,
    LoanLimits, LoanParameters,
};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModelArg {
    Reducing,
    Flat,
}

impl From<ModelArg> for InterestModel {
    fn from(m: ModelArg) -> Self {
        match m {
            ModelArg::Reducing => InterestModel::Reducing,
            ModelArg::Flat => InterestModel::Flat,
        }
    }
}

/// Loan parameters: a JSON file, piped JSON, or individual flags
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure_months: Option<i64>,

    /// Annual interest rate in percent (10 = 10%)
    #[arg(long, alias = "annual-interest-rate-percent")]
    pub rate: Option<Decimal>,

    /// Moratorium months (interest capitalised, no installments)
    #[arg(long)]
    pub moratorium_months: Option<i64>,

    /// Interest model
    #[arg(long, value_enum)]
    pub model: Option<ModelArg>,

    /// Processing fee in percent of principal
    #[arg(long)]
    pub processing_fee: Option<Decimal>,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Roll months up into loan years
    #[arg(long)]
    pub yearly: bool,

    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long, conflicts_with = "yearly")]
    pub start_date: Option<NaiveDate>,
}

impl LoanArgs {
    fn flags(&self) -> LoanInput {
        LoanInput {
            loan_amount: self.loan_amount,
            down_payment: self.down_payment,
            tenure_months: self.tenure_months,
            annual_interest_rate_percent: self.rate,
            moratorium_months: self.moratorium_months,
            interest_model: self.model.map(InterestModel::from),
            processing_fee_percent: self.processing_fee,
        }
    }

    fn loan_form(&self) -> Result<LoanForm, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            input::file::read_json(path)
        } else if let Some(data) = input::stdin::read_stdin::<LoanForm>()? {
            Ok(data)
        } else {
            Ok(LoanForm::from(&self.flags()))
        }
    }

    fn parameters(
        &self,
        limits: &LoanLimits,
    ) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        let form = self.loan_form()?;
        validate_form(&form, limits).map_err(|e| EmiError::Validation(e).into())
    }
}

pub fn run_validate(
    args: LoanArgs,
    limits: &LoanLimits,
) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.parameters(limits)?;
    Ok(json!({
        "valid": true,
        "parameters": params,
        "principal": params.principal(),
        "repayment_tenure": params.repayment_tenure(),
    }))
}

pub fn run_compute(
    args: LoanArgs,
    limits: &LoanLimits,
) -> Result<Value, Box<dyn std::error::Error>> {
    let form = args.loan_form()?;
    let output = analyse_loan(&form, limits)?;
    // Schedule rows are served by the schedule command
    Ok(json!({
        "result": output.result.summary,
        "methodology": output.methodology,
        "assumptions": output.assumptions,
        "warnings": output.warnings,
        "metadata": output.metadata,
    }))
}

pub fn run_schedule(
    args: ScheduleArgs,
    limits: &LoanLimits,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let params = args.loan.parameters(limits)?;
    let result = compute(&params)?;

    let (methodology, warnings) = schedule_methodology(params.interest_model());

    let rows = if args.yearly {
        let years: Vec<_> = yearly_breakdown(&result.schedule)
            .iter()
            .map(|y| y.rounded())
            .collect();
        serde_json::to_value(years)?
    } else if let Some(first_due) = args.start_date {
        let rounded = round_schedule(&result.schedule);
        serde_json::to_value(date_schedule(&rounded, first_due)?)?
    } else {
        serde_json::to_value(round_schedule(&result.schedule))?
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        methodology,
        &json!({
            "principal": params.principal().to_string(),
            "emi_amount": round_money(result.emi_amount).to_string(),
            "tenure_months": params.tenure_months(),
            "moratorium_months": params.moratorium_months(),
        }),
        warnings,
        elapsed,
        rows,
    ))?)
}

fn schedule_methodology(model: InterestModel) -> (&'static str, Vec<String>) {
    match model {
        InterestModel::Reducing => ("Reducing-balance amortization schedule", Vec::new()),
        InterestModel::Flat => (
            "Flat-rate EMI on original principal (no schedule)",
            vec!["Flat-rate loans have no amortization schedule".to_string()],
        ),
    }
}

pub fn run_compare(
    args: LoanArgs,
    limits: &LoanLimits,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let params = args.parameters(limits)?;
    let comparison = compare_models(&params)?;

    let reducing = LoanSummary::from_result(&params, &comparison.reducing);
    let flat = LoanSummary::from_result(&params, &comparison.flat);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        "Reducing-balance vs flat-rate interest",
        &json!({
            "principal": params.principal().to_string(),
            "annual_interest_rate_percent": params.annual_interest_rate_percent().to_string(),
            "tenure_months": params.tenure_months(),
        }),
        Vec::new(),
        elapsed,
        json!({
            "reducing_emi": reducing.emi_amount,
            "flat_emi": flat.emi_amount,
            "reducing_total_interest": reducing.total_interest,
            "flat_total_interest": flat.total_interest,
            "interest_difference": round_money(comparison.interest_difference),
            "emi_difference": round_money(comparison.emi_difference),
        }),
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args() -> LoanArgs {
        LoanArgs {
            input: None,
            loan_amount: Some(dec!(10000)),
            down_payment: Some(dec!(1000)),
            tenure_months: Some(24),
            rate: Some(dec!(10)),
            moratorium_months: None,
            model: Some(ModelArg::Flat),
            processing_fee: None,
        }
    }

    #[test]
    fn test_flags_map_to_loan_input() {
        let raw = args().flags();
        assert_eq!(raw.loan_amount, Some(dec!(10000)));
        assert_eq!(raw.annual_interest_rate_percent, Some(dec!(10)));
        assert_eq!(raw.interest_model, Some(InterestModel::Flat));
        assert_eq!(raw.moratorium_months, None);
    }

    #[test]
    fn test_flags_pass_through_form_conversion() {
        let params = validate_form(&LoanForm::from(&args().flags()), &LoanLimits::default())
            .unwrap();
        assert_eq!(params.principal(), dec!(9000));
        assert_eq!(params.interest_model(), InterestModel::Flat);
    }

    #[test]
    fn test_schedule_methodology_follows_model() {
        let (reducing, warnings) = schedule_methodology(InterestModel::Reducing);
        assert!(reducing.starts_with("Reducing-balance"));
        assert!(warnings.is_empty());

        let (flat, warnings) = schedule_methodology(InterestModel::Flat);
        assert!(flat.starts_with("Flat-rate"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_missing_flags_surface_as_field_errors() {
        let mut a = args();
        a.tenure_months = None;
        let errors = emi_core::validate(&a.flags()).unwrap_err();
        assert!(errors.contains("tenure_months"));
    }
}
