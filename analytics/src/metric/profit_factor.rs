use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ratio of gross profit to gross loss across a closed-trade log.
///
/// `None` when there is no closed loss to divide by (an all-winning log has
/// no profit factor, rather than an infinite one).
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct ProfitFactor {
    pub value: Decimal,
}

impl ProfitFactor {
    pub fn calculate(gross_profit: Decimal, gross_loss: Decimal) -> Option<Self> {
        let loss = gross_loss.abs();
        if loss == Decimal::ZERO {
            None
        } else {
            let value = gross_profit.abs().checked_div(loss)?;
            Some(Self { value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn no_losses_is_none() {
        assert_eq!(ProfitFactor::calculate(dec!(100), Decimal::ZERO), None);
    }

    #[test]
    fn two_to_one() {
        assert_eq!(
            ProfitFactor::calculate(dec!(200), dec!(-100))
                .unwrap()
                .value,
            dec!(2)
        );
    }
}
