use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Win rate in `[0, 1]`, computed as `wins / total`.
///
/// `None` when there are no trades to divide by.
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct WinRate {
    pub value: Decimal,
}

impl WinRate {
    pub fn calculate(wins: Decimal, total: Decimal) -> Option<Self> {
        if total == Decimal::ZERO {
            None
        } else {
            let value = wins.abs().checked_div(total.abs())?;
            Some(Self { value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn no_trades_is_none() {
        assert_eq!(WinRate::calculate(Decimal::ZERO, Decimal::ZERO), None);
    }

    #[test]
    fn mixed_trades() {
        assert_eq!(
            WinRate::calculate(dec!(6), Decimal::TEN).unwrap().value,
            dec!(0.6)
        );
    }
}
