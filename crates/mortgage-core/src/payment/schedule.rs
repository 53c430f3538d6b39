//! Level-payment schedule and term-end position.
//!
//! The payment comes from the closed-form annuity (or the interest-only
//! coupon); the term-end balance and interest come from a deterministic
//! period-by-period walk, bounded by the number of periods simulated.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::rates::{periodic_rate, PeriodicRateConvention};
use crate::time_value::{annuity_payment, interest_only_payment};
use crate::types::{non_negative, Money, Rate};
use crate::MortgageResult;

/// Balance below which the loan is considered fully repaid.
const BALANCE_EPSILON: Decimal = dec!(0.01);

/// Longest amortization any calculator accepts.
pub const MAX_AMORTIZATION_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    #[default]
    Regular,
    InterestOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    BiWeekly,
    /// Half the monthly payment, paid every two weeks.
    AcceleratedBiWeekly,
}

impl PaymentFrequency {
    pub fn payments_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::BiWeekly | PaymentFrequency::AcceleratedBiWeekly => 26,
        }
    }
}

/// Result of walking a balance forward a fixed number of periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSummary {
    pub principal_paid: Money,
    pub total_interest: Money,
    pub ending_balance: Money,
    /// Period in which the balance reached zero, if it did.
    pub payoff_period: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    /// Payment per period at the requested frequency.
    pub periodic_payment: Money,
    pub payments_per_year: u32,
    /// Monthly payment on the same loan, reported for every frequency.
    pub monthly_payment: Money,
    pub principal_paid_over_term: Money,
    pub total_interest_over_term: Money,
    pub balance_at_term_end: Money,
    pub total_interest_over_amortization: Money,
    /// Periods until the balance is retired; `None` for interest-only loans.
    pub payoff_periods: Option<u32>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly schedule with the monthly rate taken as `effective_annual_rate / 12`.
pub fn compute_schedule(
    principal: Money,
    effective_annual_rate: Rate,
    amortization_years: u32,
    term_years: u32,
    loan_type: LoanType,
) -> MortgageResult<PaymentSchedule> {
    schedule_for(
        principal,
        effective_annual_rate,
        amortization_years,
        term_years,
        loan_type,
        PaymentFrequency::Monthly,
        PeriodicRateConvention::Divided,
    )
}

/// Schedule at an arbitrary payment frequency and periodic-rate convention.
pub fn schedule_for(
    principal: Money,
    effective_annual_rate: Rate,
    amortization_years: u32,
    term_years: u32,
    loan_type: LoanType,
    frequency: PaymentFrequency,
    convention: PeriodicRateConvention,
) -> MortgageResult<PaymentSchedule> {
    validate_schedule(principal, effective_annual_rate, amortization_years, term_years)?;

    let monthly_r = periodic_rate(effective_annual_rate, 12, convention);
    let monthly_payment = level_payment(principal, monthly_r, amortization_years * 12, loan_type)?;

    let ppy = frequency.payments_per_year();
    let (period_rate, payment) = match frequency {
        PaymentFrequency::Monthly => (monthly_r, monthly_payment),
        PaymentFrequency::BiWeekly => {
            let r = periodic_rate(effective_annual_rate, ppy, convention);
            (r, level_payment(principal, r, amortization_years * ppy, loan_type)?)
        }
        PaymentFrequency::AcceleratedBiWeekly => {
            let r = periodic_rate(effective_annual_rate, ppy, convention);
            let payment = match loan_type {
                LoanType::Regular => monthly_payment / dec!(2),
                LoanType::InterestOnly => interest_only_payment(principal, r)?,
            };
            (r, payment)
        }
    };

    let term = simulate_term(principal, payment, period_rate, term_years * ppy);
    let full = simulate_term(principal, payment, period_rate, amortization_years * ppy);

    Ok(PaymentSchedule {
        periodic_payment: non_negative(payment),
        payments_per_year: ppy,
        monthly_payment: non_negative(monthly_payment),
        principal_paid_over_term: non_negative(term.principal_paid),
        total_interest_over_term: non_negative(term.total_interest),
        balance_at_term_end: non_negative(term.ending_balance),
        total_interest_over_amortization: non_negative(full.total_interest),
        payoff_periods: full.payoff_period,
    })
}

/// Level payment for `nper` periods: annuity for amortizing loans, coupon
/// for interest-only ones.
pub fn level_payment(
    principal: Money,
    period_rate: Rate,
    nper: u32,
    loan_type: LoanType,
) -> MortgageResult<Money> {
    match loan_type {
        LoanType::Regular => annuity_payment(principal, period_rate, nper),
        LoanType::InterestOnly => interest_only_payment(principal, period_rate),
    }
}

/// Walk `principal` forward `periods` payments. Interest accrues on the
/// opening balance; the rest of the payment reduces principal, never below
/// zero. Interest totals saturate rather than overflow.
pub fn simulate_term(principal: Money, payment: Money, period_rate: Rate, periods: u32) -> TermSummary {
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut payoff_period = None;

    if balance < BALANCE_EPSILON {
        return TermSummary {
            principal_paid: principal.max(Decimal::ZERO),
            total_interest,
            ending_balance: Decimal::ZERO,
            payoff_period: Some(0),
        };
    }

    for period in 1..=periods {
        let interest = balance.saturating_mul(period_rate);
        let mut reduction = payment - interest;
        if reduction > balance {
            reduction = balance;
        }
        if reduction < Decimal::ZERO {
            reduction = Decimal::ZERO;
        }

        total_interest = total_interest.saturating_add(interest);
        balance -= reduction;

        if balance < BALANCE_EPSILON {
            balance = Decimal::ZERO;
            payoff_period = Some(period);
            break;
        }
    }

    TermSummary {
        principal_paid: principal - balance,
        total_interest,
        ending_balance: balance,
        payoff_period,
    }
}

fn validate_schedule(
    principal: Money,
    effective_annual_rate: Rate,
    amortization_years: u32,
    term_years: u32,
) -> MortgageResult<()> {
    if principal < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative".into(),
        });
    }
    if effective_annual_rate < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "effective_annual_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if amortization_years == 0 {
        return Err(MortgageError::InvalidInput {
            field: "amortization_years".into(),
            reason: "Amortization period must be greater than zero".into(),
        });
    }
    if amortization_years > MAX_AMORTIZATION_YEARS {
        return Err(MortgageError::InvalidInput {
            field: "amortization_years".into(),
            reason: format!("Amortization cannot exceed {MAX_AMORTIZATION_YEARS} years"),
        });
    }
    if term_years == 0 {
        return Err(MortgageError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least one year".into(),
        });
    }
    if term_years > amortization_years {
        return Err(MortgageError::InvalidInput {
            field: "term_years".into(),
            reason: format!(
                "Term ({term_years} years) cannot exceed the amortization period ({amortization_years} years)"
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    #[test]
    fn test_regular_monthly_payment() {
        let s = compute_schedule(dec!(500_000), dec!(0.0629), 25, 5, LoanType::Regular).unwrap();
        assert_close(s.periodic_payment, dec!(3310.72), TOL, "monthly payment");
        assert_eq!(s.payments_per_year, 12);
        assert_eq!(s.periodic_payment, s.monthly_payment);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let s = compute_schedule(dec!(300_000), Decimal::ZERO, 25, 5, LoanType::Regular).unwrap();
        assert_eq!(s.periodic_payment, dec!(1000));
        assert_eq!(s.total_interest_over_term, Decimal::ZERO);
        assert_eq!(s.balance_at_term_end, dec!(240_000));
        assert_eq!(s.principal_paid_over_term, dec!(60_000));
    }

    #[test]
    fn test_interest_only_never_amortizes() {
        let s = compute_schedule(dec!(400_000), dec!(0.06), 25, 5, LoanType::InterestOnly).unwrap();
        assert_eq!(s.periodic_payment, dec!(2000));
        assert_eq!(s.balance_at_term_end, dec!(400_000));
        assert_eq!(s.total_interest_over_term, dec!(120_000));
        assert_eq!(s.principal_paid_over_term, Decimal::ZERO);
        assert_eq!(s.payoff_periods, None);
    }

    #[test]
    fn test_term_equal_to_amortization_retires_loan() {
        let s = compute_schedule(dec!(100_000), dec!(0.05), 10, 10, LoanType::Regular).unwrap();
        assert_eq!(s.balance_at_term_end, Decimal::ZERO);
        assert_close(s.principal_paid_over_term, dec!(100_000), TOL, "principal repaid");
        assert_close(
            s.total_interest_over_term,
            s.total_interest_over_amortization,
            TOL,
            "term interest equals lifetime interest",
        );
    }

    #[test]
    fn test_interest_plus_principal_equals_payments() {
        let s = compute_schedule(dec!(500_000), dec!(0.0629), 25, 5, LoanType::Regular).unwrap();
        let paid = s.periodic_payment * dec!(60);
        assert_close(
            s.principal_paid_over_term + s.total_interest_over_term,
            paid,
            TOL,
            "payments split into interest and principal",
        );
    }

    #[test]
    fn test_zero_principal() {
        let s = compute_schedule(Decimal::ZERO, dec!(0.05), 25, 5, LoanType::Regular).unwrap();
        assert_eq!(s.periodic_payment, Decimal::ZERO);
        assert_eq!(s.balance_at_term_end, Decimal::ZERO);
        assert_eq!(s.total_interest_over_term, Decimal::ZERO);
    }

    #[test]
    fn test_accelerated_biweekly_pays_off_sooner() {
        let monthly = compute_schedule(dec!(500_000), dec!(0.05), 25, 5, LoanType::Regular).unwrap();
        let accel = schedule_for(
            dec!(500_000),
            dec!(0.05),
            25,
            5,
            LoanType::Regular,
            PaymentFrequency::AcceleratedBiWeekly,
            PeriodicRateConvention::Divided,
        )
        .unwrap();

        assert_eq!(accel.periodic_payment, monthly.monthly_payment / dec!(2));
        assert!(accel.balance_at_term_end < monthly.balance_at_term_end);
        assert!(accel.total_interest_over_amortization < monthly.total_interest_over_amortization);
        let payoff = accel.payoff_periods.unwrap();
        assert!(payoff < 25 * 26, "accelerated payoff in {payoff} periods");
    }

    #[test]
    fn test_biweekly_payment_below_half_monthly() {
        let s = schedule_for(
            dec!(500_000),
            dec!(0.05),
            25,
            5,
            LoanType::Regular,
            PaymentFrequency::BiWeekly,
            PeriodicRateConvention::Divided,
        )
        .unwrap();
        assert_eq!(s.payments_per_year, 26);
        assert!(s.periodic_payment < s.monthly_payment / dec!(2));
    }

    #[test]
    fn test_amortization_zero_rejected() {
        let err = compute_schedule(dec!(100_000), dec!(0.05), 0, 0, LoanType::Regular).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { ref field, .. } if field == "amortization_years"));
    }

    #[test]
    fn test_term_exceeding_amortization_rejected() {
        let err = compute_schedule(dec!(100_000), dec!(0.05), 5, 10, LoanType::Regular).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { ref field, .. } if field == "term_years"));
    }

    #[test]
    fn test_amortization_above_ceiling_rejected() {
        let err =
            compute_schedule(dec!(100_000), dec!(0.05), 2_000, 5, LoanType::Regular).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { ref field, .. } if field == "amortization_years"));
        assert!(compute_schedule(dec!(100_000), dec!(0.05), 50, 5, LoanType::Regular).is_ok());
    }

    #[test]
    fn test_very_high_rate_stays_finite() {
        // 30 years at a 172% monthly-equivalent annual rate; payment is ~ the coupon
        let s = compute_schedule(dec!(500_000), dec!(2.0625), 30, 5, LoanType::Regular).unwrap();
        assert_close(s.periodic_payment, dec!(85_937.50), TOL, "coupon-dominated payment");
        assert_close(s.balance_at_term_end, dec!(500_000), TOL, "balance barely moves");
    }

    #[test]
    fn test_negative_principal_rejected() {
        assert!(compute_schedule(dec!(-1), dec!(0.05), 25, 5, LoanType::Regular).is_err());
    }

    #[test]
    fn test_simulate_term_clamps_final_period() {
        // Payment larger than the balance: one period retires it.
        let t = simulate_term(dec!(500), dec!(1000), dec!(0.01), 12);
        assert_eq!(t.ending_balance, Decimal::ZERO);
        assert_eq!(t.payoff_period, Some(1));
        assert_eq!(t.total_interest, dec!(5));
        assert_eq!(t.principal_paid, dec!(500));
    }
}
