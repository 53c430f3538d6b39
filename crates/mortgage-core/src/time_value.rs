use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

fn overflow(what: &str) -> MortgageError {
    MortgageError::invalid(what, "Result exceeds decimal range; check the rate and amount")
}

/// `(1 + rate)^-nper`. Zero once the compounding factor leaves the decimal
/// range, which is the limit the true value approaches.
fn discount_factor(rate: Rate, nper: u32) -> Decimal {
    match Decimal::ONE
        .checked_add(rate)
        .and_then(|base| base.checked_powu(nper as u64))
    {
        Some(factor) if !factor.is_zero() => Decimal::ONE / factor,
        _ => Decimal::ZERO,
    }
}

/// Level payment that retires `principal` over `nper` periods at `rate` per
/// period: `P * r / (1 - (1+r)^-n)`.
///
/// Zero rate falls back to straight-line `P / n`. Zero periods yields zero.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> MortgageResult<Money> {
    if nper == 0 || principal.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let n = Decimal::from(nper);
    if rate.is_zero() {
        return Ok(principal / n);
    }

    let coupon = principal
        .checked_mul(rate)
        .ok_or_else(|| overflow("principal"))?;
    let denom = Decimal::ONE - discount_factor(rate, nper);
    if denom.is_zero() {
        return Ok(principal / n);
    }
    coupon.checked_div(denom).ok_or_else(|| overflow("principal"))
}

/// Principal supported by a level `payment` over `nper` periods at `rate`;
/// the inverse of [`annuity_payment`].
pub fn annuity_principal(payment: Money, rate: Rate, nper: u32) -> MortgageResult<Money> {
    if nper == 0 || payment <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if rate.is_zero() {
        return payment
            .checked_mul(Decimal::from(nper))
            .ok_or_else(|| overflow("payment"));
    }

    let annuity_factor = (Decimal::ONE - discount_factor(rate, nper)) / rate;
    payment
        .checked_mul(annuity_factor)
        .ok_or_else(|| overflow("payment"))
}

/// Interest-only payment: the principal never amortizes.
pub fn interest_only_payment(principal: Money, rate: Rate) -> MortgageResult<Money> {
    principal
        .checked_mul(rate)
        .ok_or_else(|| overflow("principal"))
}

/// Principal whose interest-only payment equals `payment`. Zero when the
/// rate is zero.
pub fn interest_only_principal(payment: Money, rate: Rate) -> MortgageResult<Money> {
    if rate <= Decimal::ZERO || payment <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    payment.checked_div(rate).ok_or_else(|| overflow("payment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_annuity_payment_basic() {
        // 500k over 300 months at 0.0629/12
        let pmt = annuity_payment(dec!(500_000), dec!(0.0629) / dec!(12), 300).unwrap();
        assert!((pmt - dec!(3310.72)).abs() < dec!(0.01), "got {pmt}");
    }

    #[test]
    fn test_annuity_payment_zero_rate() {
        let pmt = annuity_payment(dec!(300_000), Decimal::ZERO, 300).unwrap();
        assert_eq!(pmt, dec!(1000));
    }

    #[test]
    fn test_annuity_round_trip() {
        let r = dec!(0.005);
        let pmt = annuity_payment(dec!(250_000), r, 240).unwrap();
        let principal = annuity_principal(pmt, r, 240).unwrap();
        assert!((principal - dec!(250_000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_annuity_principal_non_positive_payment() {
        assert_eq!(annuity_principal(dec!(-100), dec!(0.005), 300).unwrap(), Decimal::ZERO);
        assert_eq!(annuity_principal(Decimal::ZERO, dec!(0.005), 300).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_interest_only() {
        assert_eq!(interest_only_payment(dec!(400_000), dec!(0.005)).unwrap(), dec!(2000));
        assert_eq!(interest_only_principal(dec!(2000), dec!(0.005)).unwrap(), dec!(400_000));
        assert_eq!(interest_only_principal(dec!(2000), Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_compounding_factor_beyond_decimal_range() {
        // 1.5^1000 does not fit in a Decimal; the discount factor is taken as 0
        assert_eq!(annuity_payment(dec!(1_000), dec!(0.5), 1_000).unwrap(), dec!(500));
        assert_eq!(annuity_principal(dec!(500), dec!(0.5), 1_000).unwrap(), dec!(1_000));
    }

    #[test]
    fn test_coupon_overflow_is_an_error() {
        let huge = Decimal::MAX / dec!(2);
        assert!(annuity_payment(huge, dec!(3), 12).is_err());
        assert!(interest_only_payment(huge, dec!(3)).is_err());
    }
}
