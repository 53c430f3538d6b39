//! Nominal-to-effective rate conversion.
//!
//! Calculators take the rate the way a borrower quotes it: an annual
//! percentage with a stated compounding convention. Everything downstream
//! works from the effective annual rate produced here.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::types::{Percent, Rate};
use crate::MortgageResult;

/// Compounding frequency of a quoted nominal rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    Annual,
    #[default]
    SemiAnnual,
    Monthly,
    Daily,
}

impl Compounding {
    pub fn periods_per_year(self) -> u32 {
        match self {
            Compounding::Annual => 1,
            Compounding::SemiAnnual => 2,
            Compounding::Monthly => 12,
            Compounding::Daily => 365,
        }
    }
}

/// How an effective annual rate is split into a per-payment rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodicRateConvention {
    /// `EAR / p`
    #[default]
    Divided,
    /// `(1 + EAR)^(1/p) - 1`
    Equivalent,
}

/// Effective annual rate for a nominal annual percentage compounded `n` times
/// a year: `(1 + r/n)^n - 1`.
///
/// A zero rate is allowed and returns zero; the annuity helpers short-circuit
/// on it.
pub fn effective_annual_rate(
    annual_rate_percent: Percent,
    compounding: Compounding,
) -> MortgageResult<Rate> {
    if annual_rate_percent < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }

    let nominal = annual_rate_percent / dec!(100);
    if nominal.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let n = compounding.periods_per_year();
    if n == 1 {
        return Ok(nominal);
    }

    let per_period = Decimal::ONE + nominal / Decimal::from(n);
    per_period
        .checked_powu(n as u64)
        .map(|growth| growth - Decimal::ONE)
        .ok_or_else(|| {
            MortgageError::invalid("annual_rate_percent", "Interest rate is too large to compound")
        })
}

/// Monthly annuity rate used by the payment and affordability calculators.
pub fn monthly_rate(effective_annual: Rate) -> Rate {
    effective_annual / dec!(12)
}

/// Per-payment rate for `periods_per_year` payments under the given convention.
pub fn periodic_rate(
    effective_annual: Rate,
    periods_per_year: u32,
    convention: PeriodicRateConvention,
) -> Rate {
    if periods_per_year == 0 || effective_annual.is_zero() {
        return Decimal::ZERO;
    }
    let p = Decimal::from(periods_per_year);
    match convention {
        PeriodicRateConvention::Divided => effective_annual / p,
        PeriodicRateConvention::Equivalent => {
            (Decimal::ONE + effective_annual).powd(Decimal::ONE / p) - Decimal::ONE
        }
    }
}
