use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use emi_core::report::{analyse_loan, compare_models, round_schedule, yearly_breakdown};
use emi_core::{compute, validate_form, FieldErrors, LoanForm, LoanLimits, LoanParameters};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Loan form plus optional limit overrides, as sent by the dashboard.
#[derive(Deserialize)]
struct LoanRequest {
    #[serde(flatten)]
    loan: LoanForm,
    #[serde(default)]
    limits: Option<LoanLimits>,
}

fn parse_request(input_json: &str) -> NapiResult<LoanRequest> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn parameters(request: &LoanRequest) -> Result<LoanParameters, String> {
    let limits = request.limits.clone().unwrap_or_default();
    validate_form(&request.loan, &limits).map_err(|errors| {
        serde_json::to_string(&errors).unwrap_or_else(|_| errors.to_string())
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Returns `{"valid": true}` or `{"valid": false, "errors": {field: message}}`.
/// Invalid input is an expected outcome here, not a thrown error. A request
/// that is not a JSON object is reported under the `request` key.
#[napi]
pub fn validate_loan(input_json: String) -> NapiResult<String> {
    let outcome = serde_json::from_str::<LoanRequest>(&input_json)
        .map_err(|e| {
            let mut errors = FieldErrors::new();
            errors.add("request", format!("Request must be a JSON object: {e}"));
            errors
        })
        .and_then(|request| {
            let limits = request.limits.unwrap_or_default();
            validate_form(&request.loan, &limits)
        });
    let body = match outcome {
        Ok(params) => serde_json::json!({ "valid": true, "parameters": params }),
        Err(errors) => serde_json::json!({ "valid": false, "errors": errors }),
    };
    serde_json::to_string(&body).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_loan(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let limits = request.limits.clone().unwrap_or_default();
    let output = analyse_loan(&request.loan, &limits).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Rounded schedule rows plus the yearly roll-up used by the charts.
#[napi]
pub fn loan_schedule(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let params = parameters(&request).map_err(napi::Error::from_reason)?;
    let result = compute(&params).map_err(to_napi_error)?;
    let body = serde_json::json!({
        "monthly": round_schedule(&result.schedule),
        "yearly": yearly_breakdown(&result.schedule)
            .iter()
            .map(|y| y.rounded())
            .collect::<Vec<_>>(),
    });
    serde_json::to_string(&body).map_err(to_napi_error)
}

#[napi]
pub fn compare_loan_models(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let params = parameters(&request).map_err(napi::Error::from_reason)?;
    let comparison = compare_models(&params).map_err(to_napi_error)?;
    serde_json::to_string(&comparison).map_err(to_napi_error)
}
