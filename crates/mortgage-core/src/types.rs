use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.0629 = 6.29%).
pub type Rate = Decimal;

/// Percentages as entered on the calculators (6.29 = 6.29%).
pub type Percent = Decimal;

/// Floor a monetary figure at zero.
///
/// Every public calculator routes its outputs through here, so a negative
/// affordability, tax or balance is always reported as 0.
pub fn non_negative(value: Money) -> Money {
    if value < Decimal::ZERO {
        tracing::debug!(%value, "clamping negative figure to zero");
        Decimal::ZERO
    } else {
        value
    }
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        numerator / denominator
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
    use rust_decimal_macros::dec;

    #[test]
    fn test_non_negative_clamps() {
        assert_eq!(non_negative(dec!(-12.5)), Decimal::ZERO);
        assert_eq!(non_negative(dec!(12.5)), dec!(12.5));
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio_or_zero(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(ratio_or_zero(dec!(10), dec!(4)), dec!(2.5));
    }
}
