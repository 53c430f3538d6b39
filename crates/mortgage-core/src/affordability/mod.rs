//! Maximum mortgage and required income calculators.
//!
//! Both apply the stress-test policy and compounding adjustment to the quoted
//! rate, then hand the effective rate to [`engine::evaluate`].

pub mod engine;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::payment::LoanTerms;
use crate::rates::effective_annual_rate;
use crate::stress_test::StressTestPolicy;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageResult;

pub use engine::{
    evaluate, max_mortgage, required_income, AffordabilityResult, DebtServiceConstraint, SolveFor,
};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Share of an amount counted by the lender: 50, 80 or 100 percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InclusionPercent {
    Fifty,
    Eighty,
    Hundred,
}

impl InclusionPercent {
    pub fn fraction(self) -> Decimal {
        match self {
            InclusionPercent::Fifty => dec!(0.5),
            InclusionPercent::Eighty => dec!(0.8),
            InclusionPercent::Hundred => Decimal::ONE,
        }
    }
}

impl TryFrom<u8> for InclusionPercent {
    type Error = MortgageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            50 => Ok(InclusionPercent::Fifty),
            80 => Ok(InclusionPercent::Eighty),
            100 => Ok(InclusionPercent::Hundred),
            other => Err(MortgageError::InvalidInput {
                field: "inclusion_percent".into(),
                reason: format!("{other} is not one of 50, 80 or 100"),
            }),
        }
    }
}

impl From<InclusionPercent> for u8 {
    fn from(value: InclusionPercent) -> Self {
        match value {
            InclusionPercent::Fifty => 50,
            InclusionPercent::Eighty => 80,
            InclusionPercent::Hundred => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalIncomeRule {
    /// Prorated rent is added to gross income.
    #[default]
    AddBack,
    /// Prorated rent is subtracted from housing costs.
    Offset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingCosts {
    pub property_tax_annual: Money,
    pub condo_fees_monthly: Money,
    pub heat_monthly: Money,
    pub condo_fee_inclusion: InclusionPercent,
}

impl Default for HousingCosts {
    fn default() -> Self {
        Self {
            property_tax_annual: Decimal::ZERO,
            condo_fees_monthly: Decimal::ZERO,
            heat_monthly: Decimal::ZERO,
            condo_fee_inclusion: InclusionPercent::Fifty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalIncome {
    pub monthly_amount: Money,
    pub rule: RentalIncomeRule,
    pub portion: InclusionPercent,
}

impl Default for RentalIncome {
    fn default() -> Self {
        Self {
            monthly_amount: Decimal::ZERO,
            rule: RentalIncomeRule::AddBack,
            portion: InclusionPercent::Fifty,
        }
    }
}

/// Lender debt-service limits in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtServiceLimits {
    /// 20 to 50.
    pub gds_limit_percent: Percent,
    /// 30 to 50.
    pub tds_limit_percent: Percent,
}

impl Default for DebtServiceLimits {
    fn default() -> Self {
        Self {
            gds_limit_percent: dec!(35),
            tds_limit_percent: dec!(42),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInputs {
    #[serde(flatten)]
    pub loan: LoanTerms,
    /// Ignored when solving for income.
    #[serde(default)]
    pub gross_annual_income: Money,
    #[serde(default)]
    pub monthly_debt_payments: Money,
    #[serde(default)]
    pub housing: HousingCosts,
    #[serde(default)]
    pub rental: RentalIncome,
    #[serde(default)]
    pub limits: DebtServiceLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredIncomeInput {
    pub mortgage_amount: Money,
    #[serde(flatten)]
    pub borrower: AffordabilityInputs,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    /// Rate the borrower was qualified at, after the stress test.
    pub qualifying_rate_percent: Percent,
    pub effective_annual_rate: Rate,
    #[serde(flatten)]
    pub affordability: AffordabilityResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Largest mortgage the borrower qualifies for under GDS and TDS limits.
pub fn calculate_max_mortgage(
    inputs: &AffordabilityInputs,
    policy: &StressTestPolicy,
) -> MortgageResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let (qualifying, ear) = qualify(inputs, policy, &mut warnings)?;
    let result = max_mortgage(inputs, ear)?;

    if inputs.gross_annual_income <= Decimal::ZERO {
        warnings.push("Gross income is zero; no mortgage can be supported".into());
    } else if ear.is_zero() {
        warnings.push("Zero interest rate; maximum mortgage is not reported".into());
    } else if result.max_principal.is_zero() {
        warnings.push(
            "Housing costs and debts already exceed the allowed debt-service ratios".into(),
        );
    }

    let output = AffordabilityOutput {
        qualifying_rate_percent: qualifying,
        effective_annual_rate: ear,
        affordability: result,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "GDS/TDS maximum mortgage (binding constraint = lower principal)",
        inputs,
        warnings,
        elapsed,
        output,
    ))
}

/// Gross income needed to qualify for a given mortgage amount.
pub fn calculate_required_income(
    input: &RequiredIncomeInput,
    policy: &StressTestPolicy,
) -> MortgageResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let (qualifying, ear) = qualify(&input.borrower, policy, &mut warnings)?;
    let result = required_income(input.mortgage_amount, &input.borrower, ear)?;

    if input.mortgage_amount.is_zero() {
        warnings.push("Mortgage amount is zero; income covers housing costs only".into());
    }

    let output = AffordabilityOutput {
        qualifying_rate_percent: qualifying,
        effective_annual_rate: ear,
        affordability: result,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "GDS/TDS required income (binding constraint = higher income)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Stress-test the quoted rate and convert it to an effective annual rate.
fn qualify(
    inputs: &AffordabilityInputs,
    policy: &StressTestPolicy,
    warnings: &mut Vec<String>,
) -> MortgageResult<(Percent, Rate)> {
    let contract = inputs.loan.annual_rate_percent;
    let qualifying = policy.qualifying_rate(contract, inputs.loan.stress_test_enabled);
    if qualifying > contract {
        warnings.push(format!(
            "Stress test applied: qualifying at {qualifying}% instead of {contract}%"
        ));
    }
    let ear = effective_annual_rate(qualifying, inputs.loan.compounding)?;
    Ok((qualifying, ear))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::LoanType;
    use crate::rates::Compounding;

    fn borrower() -> AffordabilityInputs {
        AffordabilityInputs {
            loan: LoanTerms {
                annual_rate_percent: dec!(4.5),
                compounding: Compounding::SemiAnnual,
                amortization_years: 25,
                term_years: 5,
                loan_type: LoanType::Regular,
                stress_test_enabled: true,
            },
            gross_annual_income: dec!(100_000),
            monthly_debt_payments: Decimal::ZERO,
            housing: HousingCosts {
                property_tax_annual: dec!(10_000),
                heat_monthly: dec!(200),
                ..HousingCosts::default()
            },
            rental: RentalIncome::default(),
            limits: DebtServiceLimits::default(),
        }
    }

    #[test]
    fn test_inclusion_percent_conversions() {
        assert_eq!(InclusionPercent::try_from(80).unwrap(), InclusionPercent::Eighty);
        assert!(InclusionPercent::try_from(75).is_err());
        assert_eq!(u8::from(InclusionPercent::Hundred), 100);
    }

    #[test]
    fn test_inclusion_percent_serde() {
        let json = serde_json::to_string(&InclusionPercent::Fifty).unwrap();
        assert_eq!(json, "50");
        let parsed: InclusionPercent = serde_json::from_str("100").unwrap();
        assert_eq!(parsed, InclusionPercent::Hundred);
        assert!(serde_json::from_str::<InclusionPercent>("60").is_err());
    }

    #[test]
    fn test_stress_test_lowers_max_mortgage() {
        let stressed = calculate_max_mortgage(&borrower(), &StressTestPolicy::default()).unwrap();
        let mut relaxed_input = borrower();
        relaxed_input.loan.stress_test_enabled = false;
        let relaxed = calculate_max_mortgage(&relaxed_input, &StressTestPolicy::default()).unwrap();

        assert_eq!(stressed.result.qualifying_rate_percent, dec!(5.25));
        assert_eq!(relaxed.result.qualifying_rate_percent, dec!(4.5));
        assert!(stressed.result.affordability.max_principal < relaxed.result.affordability.max_principal);
        assert!(stressed.warnings.iter().any(|w| w.contains("Stress test")));
    }

    #[test]
    fn test_zero_income_warns() {
        let mut input = borrower();
        input.gross_annual_income = Decimal::ZERO;
        let out = calculate_max_mortgage(&input, &StressTestPolicy::default()).unwrap();
        assert_eq!(out.result.affordability.max_principal, Decimal::ZERO);
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_required_income_front_door() {
        let input = RequiredIncomeInput {
            mortgage_amount: dec!(500_000),
            borrower: borrower(),
        };
        let out = calculate_required_income(&input, &StressTestPolicy::default()).unwrap();
        let r = &out.result.affordability;
        assert_eq!(r.max_principal, dec!(500_000));
        assert!(r.required_annual_income > Decimal::ZERO);
        assert!((r.gds_ratio - dec!(35)).abs() < dec!(0.0001) || (r.tds_ratio - dec!(42)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_flat_json_input() {
        let json = r#"{
            "annual_rate_percent": "6.29",
            "compounding": "semi_annual",
            "amortization_years": 25,
            "term_years": 5,
            "gross_annual_income": "100000",
            "housing": { "property_tax_annual": "10000", "heat_monthly": "200", "condo_fee_inclusion": 50 },
            "limits": { "gds_limit_percent": "35", "tds_limit_percent": "42" }
        }"#;
        let input: AffordabilityInputs = serde_json::from_str(json).unwrap();
        assert_eq!(input.loan.amortization_years, 25);
        assert_eq!(input.loan.compounding, Compounding::SemiAnnual);
        assert_eq!(input.rental.rule, RentalIncomeRule::AddBack);
        assert!(!input.loan.stress_test_enabled);
    }
}
