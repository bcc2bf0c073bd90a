pub mod amortization;
pub mod decimal;
pub mod error;
pub mod report;
pub mod types;
pub mod validation;

#[cfg(feature = "calendar")]
pub mod calendar;

pub use amortization::{compute, generate_schedule, AmortizationEntry, AmortizationResult};
pub use error::{ComputationError, EmiError, FieldErrors};
pub use types::*;
pub use validation::{
    validate, validate_form, validate_with_limits, LoanForm, LoanInput, LoanLimits,
    LoanParameters,
};

/// Standard result type for all emi-core operations
pub type EmiResult<T> = Result<T, EmiError>;
