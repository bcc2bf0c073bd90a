use serde::{Deserialize, Serialize};

/// Monetary amounts in currency units, at full decimal precision.
pub type Money = rust_decimal::Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = rust_decimal::Decimal;

/// Rates expressed as percentages (10 = 10%), as entered on a loan form.
pub type Percent = rust_decimal::Decimal;

/// How interest is charged over the life of the loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InterestModel {
    /// Interest on the outstanding balance each month.
    #[default]
    Reducing,
    /// Interest once on the original principal for the full tenure.
    Flat,
}

impl InterestModel {
    pub fn label(&self) -> &'static str {
        match self {
            InterestModel::Reducing => "REDUCING",
            InterestModel::Flat => "FLAT",
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_model_wire_names() {
        assert_eq!(
            serde_json::to_string(&InterestModel::Reducing).unwrap(),
            "\"REDUCING\""
        );
        let flat: InterestModel = serde_json::from_str("\"FLAT\"").unwrap();
        assert_eq!(flat, InterestModel::Flat);
    }

    #[test]
    fn test_default_model_is_reducing() {
        assert_eq!(InterestModel::default(), InterestModel::Reducing);
    }
}
