//! GDS/TDS affordability engine.
//!
//! One routine serves both calculators: it either solves for the largest
//! principal the borrower's income supports (the smaller of the GDS and TDS
//! principals binds) or, given a principal, solves for the income needed to
//! carry it (the larger of the GDS and TDS incomes binds).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{AffordabilityInputs, RentalIncomeRule};
use crate::error::MortgageError;
use crate::payment::{level_payment, LoanType, MAX_AMORTIZATION_YEARS};
use crate::rates::monthly_rate;
use crate::time_value::{annuity_principal, interest_only_principal};
use crate::types::{non_negative, ratio_or_zero, Money, Rate};
use crate::MortgageResult;

const GDS_RANGE: (Decimal, Decimal) = (dec!(20), dec!(50));
const TDS_RANGE: (Decimal, Decimal) = (dec!(30), dec!(50));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveFor {
    MaxPrincipal,
    RequiredIncome { mortgage_amount: Money },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtServiceConstraint {
    Gds,
    Tds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    /// Largest qualifying principal, or the target mortgage when solving for
    /// income.
    pub max_principal: Money,
    /// Gross annual income needed to carry `max_principal`.
    pub required_annual_income: Money,
    /// Housing costs plus payment as a percentage of monthly income.
    pub gds_ratio: Decimal,
    /// All obligations plus payment as a percentage of monthly income.
    pub tds_ratio: Decimal,
    pub max_principal_by_gds: Money,
    pub max_principal_by_tds: Money,
    pub binding_constraint: DebtServiceConstraint,
    pub monthly_payment: Money,
    pub monthly_housing_costs: Money,
    pub monthly_total_obligations: Money,
    pub adjusted_annual_income: Money,
    pub prorated_rental_income: Money,
    pub monthly_cash_remaining: Money,
}

/// Monthly carrying costs and income after the rental rule is applied.
#[derive(Debug, Clone, Copy)]
struct MonthlyPosition {
    housing: Money,
    debts: Money,
    prorated_rental: Money,
    adjusted_annual_income: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Largest principal supported by the borrower's income at `effective_annual_rate`.
pub fn max_mortgage(
    inputs: &AffordabilityInputs,
    effective_annual_rate: Rate,
) -> MortgageResult<AffordabilityResult> {
    evaluate(inputs, SolveFor::MaxPrincipal, effective_annual_rate)
}

/// Income needed to qualify for `mortgage_amount` at `effective_annual_rate`.
pub fn required_income(
    mortgage_amount: Money,
    inputs: &AffordabilityInputs,
    effective_annual_rate: Rate,
) -> MortgageResult<AffordabilityResult> {
    evaluate(
        inputs,
        SolveFor::RequiredIncome { mortgage_amount },
        effective_annual_rate,
    )
}

pub fn evaluate(
    inputs: &AffordabilityInputs,
    mode: SolveFor,
    effective_annual_rate: Rate,
) -> MortgageResult<AffordabilityResult> {
    validate_inputs(inputs, mode, effective_annual_rate)?;

    let position = monthly_position(inputs);
    let r = monthly_rate(effective_annual_rate);
    let nper = inputs.loan.amortization_years * 12;
    let loan_type = inputs.loan.loan_type;
    let gds = inputs.limits.gds_limit_percent / dec!(100);
    let tds = inputs.limits.tds_limit_percent / dec!(100);

    // Principal ceilings implied by the borrower's own income.
    let (by_gds, by_tds) = if inputs.gross_annual_income <= Decimal::ZERO || r <= Decimal::ZERO {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let monthly_income = position.adjusted_annual_income / dec!(12);
        let gds_payment = non_negative(monthly_income * gds - position.housing);
        let tds_payment = non_negative(monthly_income * tds - position.housing - position.debts);
        (
            principal_from_payment(gds_payment, r, nper, loan_type)?,
            principal_from_payment(tds_payment, r, nper, loan_type)?,
        )
    };

    let (principal, principal_binding) = if by_gds <= by_tds {
        (by_gds, DebtServiceConstraint::Gds)
    } else {
        (by_tds, DebtServiceConstraint::Tds)
    };

    let principal = match mode {
        SolveFor::MaxPrincipal => principal,
        SolveFor::RequiredIncome { mortgage_amount } => mortgage_amount,
    };

    let payment = non_negative(level_payment(principal, r, nper, loan_type)?);

    // Income at which each ratio would sit exactly on its limit.
    let income_for_gds = annualize(payment + position.housing)? / gds;
    let income_for_tds = annualize(payment + position.housing + position.debts)? / tds;
    let (required_adjusted, income_binding) = if income_for_gds >= income_for_tds {
        (income_for_gds, DebtServiceConstraint::Gds)
    } else {
        (income_for_tds, DebtServiceConstraint::Tds)
    };
    let required_gross = match inputs.rental.rule {
        RentalIncomeRule::AddBack => required_adjusted - position.prorated_rental * dec!(12),
        RentalIncomeRule::Offset => required_adjusted,
    };

    let (binding_constraint, adjusted_annual_income) = match mode {
        SolveFor::MaxPrincipal => (principal_binding, position.adjusted_annual_income),
        SolveFor::RequiredIncome { .. } => (income_binding, required_adjusted),
    };

    let monthly_income = adjusted_annual_income / dec!(12);
    let housing_total = payment + position.housing;
    let obligations = housing_total + position.debts;

    tracing::debug!(
        mode = ?mode,
        binding = ?binding_constraint,
        principal = %principal,
        payment = %payment,
        "affordability evaluated"
    );

    Ok(AffordabilityResult {
        max_principal: non_negative(principal),
        required_annual_income: non_negative(required_gross),
        gds_ratio: non_negative(ratio_or_zero(housing_total, monthly_income) * dec!(100)),
        tds_ratio: non_negative(ratio_or_zero(obligations, monthly_income) * dec!(100)),
        max_principal_by_gds: non_negative(by_gds),
        max_principal_by_tds: non_negative(by_tds),
        binding_constraint,
        monthly_payment: payment,
        monthly_housing_costs: non_negative(position.housing),
        monthly_total_obligations: non_negative(obligations),
        adjusted_annual_income: non_negative(adjusted_annual_income),
        prorated_rental_income: non_negative(position.prorated_rental),
        monthly_cash_remaining: non_negative(monthly_income - obligations),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn monthly_position(inputs: &AffordabilityInputs) -> MonthlyPosition {
    let h = &inputs.housing;
    let mut housing = h.property_tax_annual / dec!(12)
        + h.condo_fees_monthly * h.condo_fee_inclusion.fraction()
        + h.heat_monthly;

    let prorated_rental = inputs.rental.monthly_amount * inputs.rental.portion.fraction();
    let mut adjusted_annual_income = inputs.gross_annual_income;

    match inputs.rental.rule {
        RentalIncomeRule::AddBack => adjusted_annual_income += prorated_rental * dec!(12),
        // Rental income can cancel housing costs but never turn them negative.
        RentalIncomeRule::Offset => housing = non_negative(housing - prorated_rental),
    }

    MonthlyPosition {
        housing,
        debts: inputs.monthly_debt_payments,
        prorated_rental,
        adjusted_annual_income,
    }
}

fn annualize(monthly: Money) -> MortgageResult<Money> {
    monthly
        .checked_mul(dec!(12))
        .ok_or_else(|| MortgageError::invalid("mortgage_amount", "Amount exceeds decimal range"))
}

fn principal_from_payment(
    payment: Money,
    r: Rate,
    nper: u32,
    loan_type: LoanType,
) -> MortgageResult<Money> {
    if r <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    match loan_type {
        LoanType::Regular => annuity_principal(payment, r, nper),
        LoanType::InterestOnly => interest_only_principal(payment, r),
    }
}

fn validate_inputs(
    inputs: &AffordabilityInputs,
    mode: SolveFor,
    effective_annual_rate: Rate,
) -> MortgageResult<()> {
    if effective_annual_rate < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "effective_annual_rate",
            "Interest rate cannot be negative",
        ));
    }
    if inputs.loan.amortization_years == 0 {
        return Err(MortgageError::invalid(
            "amortization_years",
            "Amortization period must be greater than zero",
        ));
    }
    if inputs.loan.amortization_years > MAX_AMORTIZATION_YEARS {
        return Err(MortgageError::invalid(
            "amortization_years",
            format!("Amortization cannot exceed {MAX_AMORTIZATION_YEARS} years"),
        ));
    }
    if inputs.loan.term_years > inputs.loan.amortization_years {
        return Err(MortgageError::invalid(
            "term_years",
            "Term cannot exceed the amortization period",
        ));
    }
    let non_negative_fields = [
        ("monthly_debt_payments", inputs.monthly_debt_payments),
        ("property_tax_annual", inputs.housing.property_tax_annual),
        ("condo_fees_monthly", inputs.housing.condo_fees_monthly),
        ("heat_monthly", inputs.housing.heat_monthly),
        ("rental_income_monthly", inputs.rental.monthly_amount),
    ];
    for (field, value) in non_negative_fields {
        if value < Decimal::ZERO {
            return Err(MortgageError::invalid(field, "Amount cannot be negative"));
        }
    }

    let gds = inputs.limits.gds_limit_percent;
    if gds < GDS_RANGE.0 || gds > GDS_RANGE.1 {
        return Err(MortgageError::invalid(
            "gds_limit_percent",
            format!("GDS limit must be between {} and {}", GDS_RANGE.0, GDS_RANGE.1),
        ));
    }
    let tds = inputs.limits.tds_limit_percent;
    if tds < TDS_RANGE.0 || tds > TDS_RANGE.1 {
        return Err(MortgageError::invalid(
            "tds_limit_percent",
            format!("TDS limit must be between {} and {}", TDS_RANGE.0, TDS_RANGE.1),
        ));
    }

    if let SolveFor::RequiredIncome { mortgage_amount } = mode {
        if mortgage_amount < Decimal::ZERO {
            return Err(MortgageError::invalid(
                "mortgage_amount",
                "Mortgage amount cannot be negative",
            ));
        }
    }
    Ok(())
}
