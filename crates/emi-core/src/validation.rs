//! Loan form validation.
//!
//! [`validate`] is the only way to obtain a [`LoanParameters`]; every value of
//! that type satisfies the range and cross-field bounds in [`LoanLimits`].
//!
//! Form data arrives as a [`LoanForm`] of untyped JSON values. Type errors
//! (`"abc"` for an amount, `"reducing"` for the model) are reported in the
//! same [`FieldErrors`] map as range violations.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

use crate::decimal;
use crate::error::{ComputationError, FieldErrors};
use crate::types::{InterestModel, Money, Percent, Rate};

/// Typed loan form values, before any range checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoanInput {
    pub loan_amount: Option<Money>,
    pub down_payment: Option<Money>,
    pub tenure_months: Option<i64>,
    pub annual_interest_rate_percent: Option<Percent>,
    pub moratorium_months: Option<i64>,
    pub interest_model: Option<InterestModel>,
    pub processing_fee_percent: Option<Percent>,
}

/// Loan form exactly as submitted. Any JSON value is accepted per field;
/// `null` and `""` count as absent. Numbers may be JSON numbers or strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanForm {
    #[serde(default)]
    pub loan_amount: Option<Value>,
    #[serde(default)]
    pub down_payment: Option<Value>,
    #[serde(default)]
    pub tenure_months: Option<Value>,
    #[serde(default)]
    pub annual_interest_rate_percent: Option<Value>,
    #[serde(default)]
    pub moratorium_months: Option<Value>,
    #[serde(default)]
    pub interest_model: Option<Value>,
    #[serde(default)]
    pub processing_fee_percent: Option<Value>,
}

impl LoanForm {
    /// Convert each field to its type. Fields that fail conversion are left
    /// absent and reported in the returned map.
    pub fn parse(&self) -> (LoanInput, FieldErrors) {
        let mut errors = FieldErrors::new();
        let input = LoanInput {
            loan_amount: decimal_field(
                &mut errors,
                "loan_amount",
                "Loan amount",
                &self.loan_amount,
            ),
            down_payment: decimal_field(
                &mut errors,
                "down_payment",
                "Down payment",
                &self.down_payment,
            ),
            tenure_months: months_field(
                &mut errors,
                "tenure_months",
                "Tenure",
                &self.tenure_months,
            ),
            annual_interest_rate_percent: decimal_field(
                &mut errors,
                "annual_interest_rate_percent",
                "Interest rate",
                &self.annual_interest_rate_percent,
            ),
            moratorium_months: months_field(
                &mut errors,
                "moratorium_months",
                "Moratorium",
                &self.moratorium_months,
            ),
            interest_model: model_field(&mut errors, &self.interest_model),
            processing_fee_percent: decimal_field(
                &mut errors,
                "processing_fee_percent",
                "Processing fee",
                &self.processing_fee_percent,
            ),
        };
        (input, errors)
    }
}

impl From<&LoanInput> for LoanForm {
    fn from(input: &LoanInput) -> Self {
        fn raw<T: Serialize>(value: &Option<T>) -> Option<Value> {
            value.as_ref().and_then(|v| serde_json::to_value(v).ok())
        }
        Self {
            loan_amount: raw(&input.loan_amount),
            down_payment: raw(&input.down_payment),
            tenure_months: raw(&input.tenure_months),
            annual_interest_rate_percent: raw(&input.annual_interest_rate_percent),
            moratorium_months: raw(&input.moratorium_months),
            interest_model: raw(&input.interest_model),
            processing_fee_percent: raw(&input.processing_fee_percent),
        }
    }
}

/// Accepted bounds for each loan field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanLimits {
    pub min_loan_amount: Money,
    pub max_loan_amount: Money,
    pub min_tenure_months: u32,
    pub max_tenure_months: u32,
    pub min_annual_rate_percent: Percent,
    pub max_annual_rate_percent: Percent,
    pub max_processing_fee_percent: Percent,
}

impl Default for LoanLimits {
    fn default() -> Self {
        Self {
            min_loan_amount: dec!(1000),
            max_loan_amount: dec!(10000000),
            min_tenure_months: 6,
            max_tenure_months: 120,
            min_annual_rate_percent: dec!(1),
            max_annual_rate_percent: dec!(35),
            max_processing_fee_percent: dec!(5),
        }
    }
}

/// Validated loan parameters. Immutable; construct via [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanParameters {
    loan_amount: Money,
    down_payment: Money,
    tenure_months: u32,
    annual_interest_rate_percent: Percent,
    moratorium_months: u32,
    interest_model: InterestModel,
    processing_fee_percent: Percent,
}

impl LoanParameters {
    pub fn loan_amount(&self) -> Money {
        self.loan_amount
    }

    pub fn down_payment(&self) -> Money {
        self.down_payment
    }

    pub fn tenure_months(&self) -> u32 {
        self.tenure_months
    }

    pub fn annual_interest_rate_percent(&self) -> Percent {
        self.annual_interest_rate_percent
    }

    pub fn moratorium_months(&self) -> u32 {
        self.moratorium_months
    }

    pub fn interest_model(&self) -> InterestModel {
        self.interest_model
    }

    pub fn processing_fee_percent(&self) -> Percent {
        self.processing_fee_percent
    }

    /// Amount financed: loan amount less down payment.
    pub fn principal(&self) -> Money {
        self.loan_amount - self.down_payment
    }

    pub fn monthly_rate(&self) -> Result<Rate, ComputationError> {
        decimal::monthly_rate(self.annual_interest_rate_percent)
    }

    /// Months in which installments are paid. Zero or negative only if the
    /// moratorium bound has been bypassed.
    pub fn repayment_tenure(&self) -> i64 {
        i64::from(self.tenure_months) - i64::from(self.moratorium_months)
    }

    /// Same loan under another interest model. The model does not take part
    /// in any bound, so the copy stays valid.
    pub fn with_model(&self, interest_model: InterestModel) -> Self {
        Self {
            interest_model,
            ..self.clone()
        }
    }
}

/// Validate against the default limits.
pub fn validate(raw: &LoanInput) -> Result<LoanParameters, FieldErrors> {
    validate_with_limits(raw, &LoanLimits::default())
}

/// Check every field and cross-field bound, collecting all violations.
pub fn validate_with_limits(
    raw: &LoanInput,
    limits: &LoanLimits,
) -> Result<LoanParameters, FieldErrors> {
    let mut errors = FieldErrors::new();

    let loan_amount = required(&mut errors, "loan_amount", raw.loan_amount);
    if let Some(amount) = loan_amount {
        check_range(
            &mut errors,
            "loan_amount",
            "Loan amount",
            amount,
            limits.min_loan_amount,
            limits.max_loan_amount,
        );
    }

    let down_payment = raw.down_payment.unwrap_or(Decimal::ZERO);
    if down_payment < Decimal::ZERO {
        errors.add("down_payment", "Down payment cannot be negative");
    } else if let Some(amount) = loan_amount {
        if down_payment >= amount {
            errors.add("down_payment", "Down payment must be less than the loan amount");
        }
    }

    let tenure = required(&mut errors, "tenure_months", raw.tenure_months);
    let tenure_ok = match tenure {
        Some(t) => check_range(
            &mut errors,
            "tenure_months",
            "Tenure",
            t,
            i64::from(limits.min_tenure_months),
            i64::from(limits.max_tenure_months),
        ),
        None => false,
    };

    let rate = required(
        &mut errors,
        "annual_interest_rate_percent",
        raw.annual_interest_rate_percent,
    );
    if let Some(r) = rate {
        check_range(
            &mut errors,
            "annual_interest_rate_percent",
            "Interest rate",
            r,
            limits.min_annual_rate_percent,
            limits.max_annual_rate_percent,
        );
    }

    let moratorium = raw.moratorium_months.unwrap_or(0);
    if moratorium < 0 {
        errors.add("moratorium_months", "Moratorium cannot be negative");
    } else if let (Some(t), true) = (tenure, tenure_ok) {
        if moratorium >= t {
            errors.add(
                "moratorium_months",
                "Moratorium must be shorter than the tenure",
            );
        }
    }

    let fee = raw.processing_fee_percent.unwrap_or(Decimal::ZERO);
    check_range(
        &mut errors,
        "processing_fee_percent",
        "Processing fee",
        fee,
        Decimal::ZERO,
        limits.max_processing_fee_percent,
    );

    let interest_model = raw.interest_model.unwrap_or_default();

    match (loan_amount, tenure, rate) {
        (Some(loan_amount), Some(tenure), Some(rate)) if errors.is_empty() => {
            let (Ok(tenure_months), Ok(moratorium_months)) =
                (u32::try_from(tenure), u32::try_from(moratorium))
            else {
                errors.add("tenure_months", "Tenure is out of range");
                return Err(errors);
            };
            let params = LoanParameters {
                loan_amount,
                down_payment,
                tenure_months,
                annual_interest_rate_percent: rate,
                moratorium_months,
                interest_model,
                processing_fee_percent: fee,
            };
            debug!(
                principal = %params.principal(),
                tenure = tenure_months,
                moratorium = moratorium_months,
                model = interest_model.label(),
                "loan parameters accepted"
            );
            Ok(params)
        }
        _ => {
            debug!(fields = errors.len(), "loan parameters rejected");
            Err(errors)
        }
    }
}

/// Convert a submitted form, then validate it. Conversion and range errors
/// share one map; a field's conversion error takes precedence.
pub fn validate_form(
    form: &LoanForm,
    limits: &LoanLimits,
) -> Result<LoanParameters, FieldErrors> {
    let (input, mut errors) = form.parse();
    match validate_with_limits(&input, limits) {
        Ok(params) if errors.is_empty() => Ok(params),
        Ok(_) => {
            debug!(fields = errors.len(), "loan form rejected");
            Err(errors)
        }
        Err(more) => {
            errors.merge(more);
            Err(errors)
        }
    }
}

/// `None`, `null` and blank strings are all "not entered".
fn present(value: &Option<Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn decimal_field(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &Option<Value>,
) -> Option<Decimal> {
    let value = present(value)?;
    let parsed = parse_decimal(value);
    if parsed.is_none() {
        errors.add(field, format!("{label} must be a number"));
    }
    parsed
}

fn months_field(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &Option<Value>,
) -> Option<i64> {
    let value = present(value)?;
    let months = parse_decimal(value).and_then(|d| {
        if d.fract().is_zero() {
            d.to_i64()
        } else {
            None
        }
    });
    if months.is_none() {
        errors.add(field, format!("{label} must be a whole number of months"));
    }
    months
}

fn model_field(errors: &mut FieldErrors, value: &Option<Value>) -> Option<InterestModel> {
    let value = present(value)?;
    let model = match value {
        Value::String(s) => serde_json::from_value(Value::String(s.trim().to_string())).ok(),
        _ => None,
    };
    if model.is_none() {
        errors.add("interest_model", "Interest model must be REDUCING or FLAT");
    }
    model
}

fn required<T>(errors: &mut FieldErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.add(field, "This field is required");
    }
    value
}

fn check_range<T>(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: T,
    min: T,
    max: T,
) -> bool
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min {
        errors.add(field, format!("{label} must be at least {min}"));
        false
    } else if value > max {
        errors.add(field, format!("{label} must be at most {max}"));
        false
    } else {
        true
    }
}
