//! Land transfer tax on a home purchase.
//!
//! Marginal provincial schedules, Toronto's municipal levy, first-time buyer
//! rebates and the foreign buyer surcharge.

pub mod brackets;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::types::{non_negative, with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageResult;

use brackets::{marginal_tax, BRITISH_COLUMBIA, MANITOBA, ONTARIO, QUEBEC, TORONTO_MUNICIPAL};

/// Surcharge on foreign purchasers where one is levied.
const FOREIGN_BUYER_RATE: Rate = dec!(0.15);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    Ontario,
    Toronto,
    BritishColumbia,
    Manitoba,
    Quebec,
    Other,
}

impl Jurisdiction {
    /// Flat first-time buyer rebate before capping at the tax owed.
    pub fn first_time_buyer_rebate(self) -> Money {
        match self {
            Jurisdiction::Toronto => dec!(4475),
            Jurisdiction::Ontario => dec!(4000),
            _ => Decimal::ZERO,
        }
    }

    pub fn levies_foreign_buyer_tax(self) -> bool {
        matches!(self, Jurisdiction::Ontario | Jurisdiction::BritishColumbia)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandTransferInput {
    pub jurisdiction: Jurisdiction,
    pub home_price: Money,
    #[serde(default)]
    pub is_first_time_buyer: bool,
    #[serde(default)]
    pub is_foreign_buyer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandTransferTax {
    pub provincial_tax: Money,
    pub municipal_tax: Money,
    /// Provincial plus municipal, before rebate and surcharge.
    pub total_tax: Money,
    pub first_time_buyer_rebate: Money,
    pub foreign_buyer_tax: Money,
    pub net_tax: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn compute_tax(input: &LandTransferInput) -> MortgageResult<LandTransferTax> {
    if input.home_price <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "home_price".into(),
            reason: "Home price must be positive".into(),
        });
    }

    let price = input.home_price;
    let (provincial_tax, municipal_tax) = match input.jurisdiction {
        Jurisdiction::Ontario => (marginal_tax(price, &ONTARIO), Decimal::ZERO),
        Jurisdiction::Toronto => (
            marginal_tax(price, &ONTARIO),
            marginal_tax(price, &TORONTO_MUNICIPAL),
        ),
        Jurisdiction::BritishColumbia => (marginal_tax(price, &BRITISH_COLUMBIA), Decimal::ZERO),
        Jurisdiction::Manitoba => (marginal_tax(price, &MANITOBA), Decimal::ZERO),
        Jurisdiction::Quebec => (marginal_tax(price, &QUEBEC), Decimal::ZERO),
        Jurisdiction::Other => (Decimal::ZERO, Decimal::ZERO),
    };
    let total_tax = provincial_tax + municipal_tax;

    let first_time_buyer_rebate = if input.is_first_time_buyer {
        non_negative(input.jurisdiction.first_time_buyer_rebate().min(total_tax))
    } else {
        Decimal::ZERO
    };

    let foreign_buyer_tax = if input.is_foreign_buyer && input.jurisdiction.levies_foreign_buyer_tax() {
        price * FOREIGN_BUYER_RATE
    } else {
        Decimal::ZERO
    };

    let net_tax = non_negative(total_tax + foreign_buyer_tax - first_time_buyer_rebate);

    tracing::debug!(
        jurisdiction = ?input.jurisdiction,
        %provincial_tax,
        %municipal_tax,
        %net_tax,
        "land transfer tax computed"
    );

    Ok(LandTransferTax {
        provincial_tax: non_negative(provincial_tax),
        municipal_tax: non_negative(municipal_tax),
        total_tax: non_negative(total_tax),
        first_time_buyer_rebate,
        foreign_buyer_tax: non_negative(foreign_buyer_tax),
        net_tax,
    })
}

pub fn calculate_land_transfer_tax(
    input: &LandTransferInput,
) -> MortgageResult<ComputationOutput<LandTransferTax>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let result = compute_tax(input)?;

    if input.jurisdiction == Jurisdiction::Other {
        warnings.push("No land transfer schedule for this jurisdiction; tax reported as zero".into());
    }
    if input.is_foreign_buyer && !input.jurisdiction.levies_foreign_buyer_tax() {
        warnings.push("Foreign buyer surcharge not levied in this jurisdiction".into());
    }
    if input.is_first_time_buyer && input.jurisdiction.first_time_buyer_rebate().is_zero() {
        warnings.push("No first-time buyer rebate in this jurisdiction".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Marginal land transfer tax brackets with rebate and foreign buyer surcharge",
        input,
        warnings,
        elapsed,
        result,
    ))
}
