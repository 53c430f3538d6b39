//! Minimum down payment and mortgage default insurance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent};

const TIER_ONE_CEILING: Money = dec!(500_000);
const TIER_TWO_CEILING: Money = dec!(1_000_000);

/// Down payment share (percent) at or above which no insurance is required.
pub const UNINSURED_DOWN_PAYMENT_PERCENT: Percent = dec!(20);

/// Smallest down payment allowed on a purchase at `price`.
///
/// 5% of the first 500k, 10% of the portion up to 1M, and a flat 20% of
/// the whole price above that.
pub fn minimum_down_payment(price: Money) -> Money {
    if price <= Decimal::ZERO {
        Decimal::ZERO
    } else if price <= TIER_ONE_CEILING {
        price * dec!(0.05)
    } else if price <= TIER_TWO_CEILING {
        dec!(25_000) + (price - TIER_ONE_CEILING) * dec!(0.10)
    } else {
        price * dec!(0.20)
    }
}

/// Premium rate (fraction of the loan) for a given down payment share.
pub fn premium_rate(down_payment_percent: Percent) -> Decimal {
    if down_payment_percent >= UNINSURED_DOWN_PAYMENT_PERCENT {
        Decimal::ZERO
    } else if down_payment_percent >= dec!(15) {
        dec!(0.028)
    } else if down_payment_percent >= dec!(10) {
        dec!(0.031)
    } else {
        dec!(0.04)
    }
}

/// Default insurance premium added to the loan.
pub fn mortgage_insurance_premium(loan_amount: Money, down_payment_percent: Percent) -> Money {
    if loan_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    loan_amount * premium_rate(down_payment_percent)
}
