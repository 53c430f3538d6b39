//! Total monthly cost of owning a home.
//!
//! Combines the insured mortgage payment with property tax, condo fees,
//! heat and other carrying costs, net of rental income.

pub mod down_payment;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::payment::{schedule_for, LoanType, PaymentFrequency, MAX_AMORTIZATION_YEARS};
use crate::rates::{effective_annual_rate, Compounding, PeriodicRateConvention};
use crate::types::{non_negative, ratio_or_zero, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageResult;

pub use down_payment::{minimum_down_payment, mortgage_insurance_premium, premium_rate};

/// Amortization granted to qualifying first-time buyers of new builds.
const EXTENDED_AMORTIZATION_YEARS: u32 = 30;
const EXTENDED_AMORTIZATION_PRICE_CAP: Money = dec!(1_500_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCostInput {
    pub home_price: Money,
    pub down_payment: Money,
    pub annual_rate_percent: Percent,
    #[serde(default)]
    pub compounding: Compounding,
    pub term_years: u32,
    pub amortization_years: u32,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
    #[serde(default)]
    pub property_tax_annual: Money,
    #[serde(default)]
    pub condo_fees_monthly: Money,
    #[serde(default)]
    pub heat_monthly: Money,
    #[serde(default)]
    pub other_monthly_expenses: Money,
    #[serde(default)]
    pub rental_income_monthly: Money,
    #[serde(default)]
    pub first_time_buyer: bool,
    #[serde(default)]
    pub newly_built_home: bool,
    #[serde(default)]
    pub extended_amortization_rules: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCostOutput {
    pub minimum_down_payment: Money,
    pub meets_minimum_down_payment: bool,
    pub down_payment_percent: Percent,
    pub insurance_premium: Money,
    /// Price less down payment, plus the premium.
    pub insured_principal: Money,
    pub effective_amortization_years: u32,
    pub effective_annual_rate: Rate,
    pub payment_frequency: PaymentFrequency,
    pub periodic_payment: Money,
    pub payments_per_year: u32,
    pub monthly_equivalent_payment: Money,
    pub total_interest_over_term: Money,
    pub balance_at_term_end: Money,
    pub total_home_expenses: Money,
    pub total_monthly_cost: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Amortization after applying the first-time buyer new-build extension.
pub fn effective_amortization(input: &MonthlyCostInput) -> u32 {
    if input.extended_amortization_rules
        && input.first_time_buyer
        && input.newly_built_home
        && input.home_price <= EXTENDED_AMORTIZATION_PRICE_CAP
    {
        EXTENDED_AMORTIZATION_YEARS
    } else {
        input.amortization_years
    }
}

pub fn calculate_monthly_cost(
    input: &MonthlyCostInput,
) -> MortgageResult<ComputationOutput<MonthlyCostOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let amortization_years = effective_amortization(input);
    validate_input(input, amortization_years)?;

    let minimum = minimum_down_payment(input.home_price);
    let meets_minimum = input.down_payment >= minimum;
    if !meets_minimum {
        warnings.push(format!(
            "Down payment {} is below the minimum of {} for this price",
            input.down_payment,
            minimum.round_dp(2)
        ));
    }
    if amortization_years != input.amortization_years {
        warnings.push(format!(
            "Extended amortization applied: {amortization_years} years"
        ));
    }

    let loan_amount = input.home_price - input.down_payment;
    let down_payment_percent = ratio_or_zero(input.down_payment, input.home_price) * dec!(100);
    let insurance_premium = mortgage_insurance_premium(loan_amount, down_payment_percent);
    let insured_principal = loan_amount + insurance_premium;

    let ear = effective_annual_rate(input.annual_rate_percent, input.compounding)?;
    let schedule = schedule_for(
        insured_principal,
        ear,
        amortization_years,
        input.term_years,
        LoanType::Regular,
        input.payment_frequency,
        PeriodicRateConvention::Equivalent,
    )?;

    let monthly_equivalent_payment = schedule
        .periodic_payment
        .checked_mul(Decimal::from(schedule.payments_per_year))
        .ok_or_else(|| MortgageError::invalid("home_price", "Payment exceeds decimal range"))?
        / dec!(12);
    let total_home_expenses = input.property_tax_annual / dec!(12)
        + input.condo_fees_monthly
        + input.heat_monthly
        + input.other_monthly_expenses;
    let total_monthly_cost =
        non_negative(monthly_equivalent_payment + total_home_expenses - input.rental_income_monthly);

    if total_monthly_cost.is_zero() && !input.rental_income_monthly.is_zero() {
        warnings.push("Rental income covers all carrying costs".into());
    }

    tracing::debug!(
        %insured_principal,
        %monthly_equivalent_payment,
        %total_monthly_cost,
        "monthly cost computed"
    );

    let output = MonthlyCostOutput {
        minimum_down_payment: minimum,
        meets_minimum_down_payment: meets_minimum,
        down_payment_percent,
        insurance_premium,
        insured_principal,
        effective_amortization_years: amortization_years,
        effective_annual_rate: ear,
        payment_frequency: input.payment_frequency,
        periodic_payment: schedule.periodic_payment,
        payments_per_year: schedule.payments_per_year,
        monthly_equivalent_payment: non_negative(monthly_equivalent_payment),
        total_interest_over_term: schedule.total_interest_over_term,
        balance_at_term_end: schedule.balance_at_term_end,
        total_home_expenses: non_negative(total_home_expenses),
        total_monthly_cost,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Insured principal, compound-equivalent periodic rate, carrying costs net of rent",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &MonthlyCostInput, amortization_years: u32) -> MortgageResult<()> {
    if input.home_price <= Decimal::ZERO {
        return Err(MortgageError::invalid("home_price", "Home price must be positive"));
    }
    if input.down_payment < Decimal::ZERO {
        return Err(MortgageError::invalid("down_payment", "Down payment cannot be negative"));
    }
    if input.down_payment > input.home_price {
        return Err(MortgageError::invalid(
            "down_payment",
            "Down payment cannot exceed the home price",
        ));
    }
    if amortization_years == 0 {
        return Err(MortgageError::invalid(
            "amortization_years",
            "Amortization must be at least one year",
        ));
    }
    if amortization_years > MAX_AMORTIZATION_YEARS {
        return Err(MortgageError::invalid(
            "amortization_years",
            format!("Amortization cannot exceed {MAX_AMORTIZATION_YEARS} years"),
        ));
    }
    if input.term_years == 0 {
        return Err(MortgageError::invalid("term_years", "Term must be at least one year"));
    }
    if input.term_years > amortization_years {
        return Err(MortgageError::invalid(
            "term_years",
            "Term cannot exceed the amortization period",
        ));
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    let non_negative_fields = [
        ("property_tax_annual", input.property_tax_annual),
        ("condo_fees_monthly", input.condo_fees_monthly),
        ("heat_monthly", input.heat_monthly),
        ("other_monthly_expenses", input.other_monthly_expenses),
        ("rental_income_monthly", input.rental_income_monthly),
    ];
    for (field, value) in non_negative_fields {
        if value < Decimal::ZERO {
            return Err(MortgageError::invalid(field, "Amount cannot be negative"));
        }
    }
    Ok(())
}
