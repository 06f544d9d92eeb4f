use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::profit_factor::ProfitFactor;
use super::win_rate::WinRate;

/// Rolled-up performance figures over a closed-trade log, folded incrementally
/// as the trade log grows rather than recomputed from scratch each time.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct TradeSummary {
    pub wins: Decimal,
    pub losses: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub consecutive_losses: u32,
    pub realized_pnl: Decimal,
}

impl TradeSummary {
    /// Folds one closed trade's realized P&L into the running summary.
    pub fn record(&mut self, pnl: Decimal) {
        self.realized_pnl += pnl;
        if pnl > Decimal::ZERO {
            self.wins += Decimal::ONE;
            self.gross_profit += pnl;
            self.consecutive_losses = 0;
        } else {
            self.losses += Decimal::ONE;
            self.gross_loss += pnl;
            self.consecutive_losses += 1;
        }
    }

    pub fn total_trades(&self) -> Decimal {
        self.wins + self.losses
    }

    pub fn win_rate(&self) -> Option<WinRate> {
        WinRate::calculate(self.wins, self.total_trades())
    }

    pub fn profit_factor(&self) -> Option<ProfitFactor> {
        ProfitFactor::calculate(self.gross_profit, self.gross_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn consecutive_losses_reset_on_win() {
        let mut summary = TradeSummary::default();
        summary.record(dec!(-10));
        summary.record(dec!(-10));
        assert_eq!(summary.consecutive_losses, 2);
        summary.record(dec!(5));
        assert_eq!(summary.consecutive_losses, 0);
    }

    #[test]
    fn win_rate_and_profit_factor_track_running_totals() {
        let mut summary = TradeSummary::default();
        summary.record(dec!(100));
        summary.record(dec!(-50));
        summary.record(dec!(50));
        assert_eq!(summary.win_rate().unwrap().value, dec!(0.6666666666666666666666666667));
        assert_eq!(summary.profit_factor().unwrap().value, dec!(3));
    }
}
