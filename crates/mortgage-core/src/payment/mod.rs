//! Mortgage payment calculator.
//!
//! Turns a quoted rate, amortization and term into the periodic payment, the
//! interest/principal split over the term and the balance left at renewal.

pub mod schedule;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::rates::{effective_annual_rate, periodic_rate, Compounding, PeriodicRateConvention};
use crate::stress_test::StressTestPolicy;
use crate::types::{non_negative, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageResult;

pub use schedule::{
    compute_schedule, level_payment, schedule_for, simulate_term, LoanType, PaymentFrequency,
    PaymentSchedule, TermSummary, MAX_AMORTIZATION_YEARS,
};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Rate and structure of a mortgage product, shared by the payment and
/// affordability calculators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Quoted annual rate in percent (6.29 = 6.29%).
    pub annual_rate_percent: Percent,
    #[serde(default)]
    pub compounding: Compounding,
    pub amortization_years: u32,
    pub term_years: u32,
    #[serde(default)]
    pub loan_type: LoanType,
    #[serde(default)]
    pub stress_test_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    /// Home price when a down payment is given, otherwise the loan amount.
    pub principal_or_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    #[serde(flatten)]
    pub loan: LoanTerms,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
    #[serde(default)]
    pub rate_convention: PeriodicRateConvention,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutput {
    /// Amount financed: price less down payment.
    pub loan_amount: Money,
    pub payment_frequency: PaymentFrequency,
    pub effective_annual_rate: Rate,
    #[serde(flatten)]
    pub schedule: PaymentSchedule,
    /// Years to retire the loan at the chosen frequency.
    pub effective_amortization_years: Option<Decimal>,
    /// Stress-tested rate, present when the stress test is enabled.
    pub qualifying_rate_percent: Option<Percent>,
    /// Monthly payment at the qualifying rate.
    pub qualifying_monthly_payment: Option<Money>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the payment schedule for a mortgage.
pub fn calculate_payment(
    input: &MortgageInput,
    policy: &StressTestPolicy,
) -> MortgageResult<ComputationOutput<PaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let loan = &input.loan;
    let loan_amount = non_negative(input.principal_or_price - input.down_payment.unwrap_or_default());
    if loan_amount.is_zero() {
        warnings.push("Down payment covers the full price; nothing is financed".into());
    }

    let ear = effective_annual_rate(loan.annual_rate_percent, loan.compounding)?;
    let schedule = schedule_for(
        loan_amount,
        ear,
        loan.amortization_years,
        loan.term_years,
        loan.loan_type,
        input.payment_frequency,
        input.rate_convention,
    )?;

    let effective_amortization_years = schedule
        .payoff_periods
        .map(|p| Decimal::from(p) / Decimal::from(schedule.payments_per_year));

    let (qualifying_rate_percent, qualifying_monthly_payment) = if loan.stress_test_enabled {
        let q = policy.qualifying_rate(loan.annual_rate_percent, true);
        let q_ear = effective_annual_rate(q, loan.compounding)?;
        let q_monthly = periodic_rate(q_ear, 12, input.rate_convention);
        let q_payment = level_payment(
            loan_amount,
            q_monthly,
            loan.amortization_years * 12,
            loan.loan_type,
        )?;
        if q > loan.annual_rate_percent {
            warnings.push(format!(
                "Qualifying rate {q}% exceeds the contract rate {}%",
                loan.annual_rate_percent
            ));
        }
        (Some(q), Some(non_negative(q_payment)))
    } else {
        (None, None)
    };

    if loan.loan_type == LoanType::InterestOnly {
        warnings.push("Interest-only loan: principal does not amortize".into());
    }

    let output = PaymentOutput {
        loan_amount,
        payment_frequency: input.payment_frequency,
        effective_annual_rate: ear,
        schedule,
        effective_amortization_years,
        qualifying_rate_percent,
        qualifying_monthly_payment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity with period-by-period term simulation",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &MortgageInput) -> MortgageResult<()> {
    if input.principal_or_price <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "principal_or_price".into(),
            reason: "Price or loan amount must be positive".into(),
        });
    }
    if let Some(dp) = input.down_payment {
        if dp < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: "down_payment".into(),
                reason: "Down payment cannot be negative".into(),
            });
        }
        if dp > input.principal_or_price {
            return Err(MortgageError::InvalidInput {
                field: "down_payment".into(),
                reason: "Down payment cannot exceed the price".into(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standard_input() -> MortgageInput {
        MortgageInput {
            principal_or_price: dec!(500_000),
            down_payment: None,
            loan: LoanTerms {
                annual_rate_percent: dec!(6.29),
                compounding: Compounding::Annual,
                amortization_years: 25,
                term_years: 5,
                loan_type: LoanType::Regular,
                stress_test_enabled: false,
            },
            payment_frequency: PaymentFrequency::Monthly,
            rate_convention: PeriodicRateConvention::Divided,
        }
    }

    #[test]
    fn test_payment_default_policy() {
        let out = calculate_payment(&standard_input(), &StressTestPolicy::default()).unwrap();
        let r = &out.result;
        assert_eq!(r.loan_amount, dec!(500_000));
        assert!((r.schedule.monthly_payment - dec!(3310.72)).abs() < dec!(0.01));
        assert!(r.qualifying_rate_percent.is_none());
        assert_eq!(r.effective_amortization_years, Some(dec!(25)));
    }

    #[test]
    fn test_down_payment_reduces_loan() {
        let mut input = standard_input();
        input.principal_or_price = dec!(600_000);
        input.down_payment = Some(dec!(100_000));
        let out = calculate_payment(&input, &StressTestPolicy::default()).unwrap();
        assert_eq!(out.result.loan_amount, dec!(500_000));
    }

    #[test]
    fn test_full_down_payment_zero_financing() {
        let mut input = standard_input();
        input.down_payment = Some(dec!(500_000));
        let out = calculate_payment(&input, &StressTestPolicy::default()).unwrap();
        assert_eq!(out.result.loan_amount, Decimal::ZERO);
        assert_eq!(out.result.schedule.periodic_payment, Decimal::ZERO);
        assert_eq!(out.result.schedule.balance_at_term_end, Decimal::ZERO);
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_down_payment_above_price_rejected() {
        let mut input = standard_input();
        input.down_payment = Some(dec!(500_001));
        assert!(calculate_payment(&input, &StressTestPolicy::default()).is_err());
    }

    #[test]
    fn test_stress_test_reports_qualifying_payment() {
        let mut input = standard_input();
        input.loan.annual_rate_percent = dec!(4.5);
        input.loan.stress_test_enabled = true;
        let out = calculate_payment(&input, &StressTestPolicy::default()).unwrap();
        let r = &out.result;
        assert_eq!(r.qualifying_rate_percent, Some(dec!(5.25)));
        assert!(r.qualifying_monthly_payment.unwrap() > r.schedule.monthly_payment);
    }

    #[test]
    fn test_metadata_populated() {
        let out = calculate_payment(&standard_input(), &StressTestPolicy::default()).unwrap();
        assert!(!out.methodology.is_empty());
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
