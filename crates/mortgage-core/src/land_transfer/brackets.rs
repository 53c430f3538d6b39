use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// One marginal band: `rate` applies to the part of the price between
/// `lower` and `upper` (open-ended when `upper` is `None`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBracket {
    pub lower: Money,
    pub upper: Option<Money>,
    pub rate: Rate,
}

impl TaxBracket {
    const fn new(lower: Money, upper: Option<Money>, rate: Rate) -> Self {
        Self { lower, upper, rate }
    }

    /// Tax on the slice of `price` that falls inside this band.
    pub fn tax_on(&self, price: Money) -> Money {
        let top = match self.upper {
            Some(upper) => price.min(upper),
            None => price,
        };
        let taxable = top - self.lower;
        if taxable <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            taxable * self.rate
        }
    }
}

/// Ontario provincial schedule; Toronto levies the same schedule again.
pub const ONTARIO: [TaxBracket; 5] = [
    TaxBracket::new(dec!(0), Some(dec!(55_000)), dec!(0.005)),
    TaxBracket::new(dec!(55_000), Some(dec!(250_000)), dec!(0.01)),
    TaxBracket::new(dec!(250_000), Some(dec!(400_000)), dec!(0.015)),
    TaxBracket::new(dec!(400_000), Some(dec!(2_000_000)), dec!(0.02)),
    TaxBracket::new(dec!(2_000_000), None, dec!(0.025)),
];

pub const TORONTO_MUNICIPAL: [TaxBracket; 5] = ONTARIO;

pub const BRITISH_COLUMBIA: [TaxBracket; 3] = [
    TaxBracket::new(dec!(0), Some(dec!(200_000)), dec!(0.01)),
    TaxBracket::new(dec!(200_000), Some(dec!(2_000_000)), dec!(0.02)),
    TaxBracket::new(dec!(2_000_000), None, dec!(0.03)),
];

pub const MANITOBA: [TaxBracket; 2] = [
    TaxBracket::new(dec!(0), Some(dec!(200_000)), dec!(0.01)),
    TaxBracket::new(dec!(200_000), None, dec!(0.02)),
];

pub const QUEBEC: [TaxBracket; 3] = [
    TaxBracket::new(dec!(0), Some(dec!(250_000)), dec!(0.005)),
    TaxBracket::new(dec!(250_000), Some(dec!(500_000)), dec!(0.01)),
    TaxBracket::new(dec!(500_000), None, dec!(0.015)),
];

/// Sum of every band's tax on `price`.
pub fn marginal_tax(price: Money, brackets: &[TaxBracket]) -> Money {
    brackets.iter().map(|b| b.tax_on(price)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_below_lower_bound() {
        let b = TaxBracket::new(dec!(100), Some(dec!(200)), dec!(0.1));
        assert_eq!(b.tax_on(dec!(50)), Decimal::ZERO);
        assert_eq!(b.tax_on(dec!(150)), dec!(5));
        assert_eq!(b.tax_on(dec!(500)), dec!(10));
    }

    #[test]
    fn test_ontario_first_band_only() {
        assert_eq!(marginal_tax(dec!(50_000), &ONTARIO), dec!(250));
    }

    #[test]
    fn test_ontario_band_edges() {
        // 55k * 0.5% + 195k * 1%
        assert_eq!(marginal_tax(dec!(250_000), &ONTARIO), dec!(2225));
        // + 150k * 1.5%
        assert_eq!(marginal_tax(dec!(400_000), &ONTARIO), dec!(4475));
    }

    #[test]
    fn test_top_band_open_ended() {
        // 2000 + 36000 + 1M * 3%
        assert_eq!(marginal_tax(dec!(3_000_000), &BRITISH_COLUMBIA), dec!(68_000));
    }

    #[test]
    fn test_bands_are_contiguous() {
        for table in [&ONTARIO[..], &BRITISH_COLUMBIA[..], &MANITOBA[..], &QUEBEC[..]] {
            assert_eq!(table[0].lower, Decimal::ZERO);
            for pair in table.windows(2) {
                assert_eq!(pair[0].upper, Some(pair[1].lower));
            }
            assert_eq!(table[table.len() - 1].upper, None);
        }
    }
}
