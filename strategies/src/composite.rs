// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Weighted scoring over the [`Factors`](crate::factors::Factors) set and the
//! decision rule that turns a score into BUY/SELL/HOLD (spec §4.5).

use autotrader_markets::Action;

use crate::factors::Factors;

/// Decision threshold: a score at or above this commits to BUY/SELL.
pub const THRESHOLD: f64 = 0.55;

fn flag(predicate: bool) -> f64 {
    if predicate {
        1.0
    } else {
        0.0
    }
}

/// `0.25*bull_ma + 0.25*macd_g + 0.15*rsi_bull + 0.10*kdj_bull + 0.10*vol_conf
/// + 0.10*oi_up + 0.05*breakout`.
pub fn buy_score(f: &Factors) -> f64 {
    0.25 * flag(f.bull_ma)
        + 0.25 * flag(f.macd_g)
        + 0.15 * flag(f.rsi_bull)
        + 0.10 * flag(f.kdj_bull)
        + 0.10 * flag(f.vol_conf)
        + 0.10 * flag(f.oi_up)
        + 0.05 * flag(f.breakout)
}

/// Symmetric to [`buy_score`], substituting the bearish predicates.
pub fn sell_score(f: &Factors) -> f64 {
    0.25 * flag(f.bear_ma)
        + 0.25 * flag(f.macd_d)
        + 0.15 * flag(f.rsi_bear)
        + 0.10 * flag(f.kdj_bear)
        + 0.10 * flag(f.vol_conf)
        + 0.10 * flag(f.oi_up)
        + 0.05 * flag(f.breakdown)
}

/// The "no-man's-land" veto: RSI sitting in `[40, 60]` with neither a fresh
/// MACD cross nor a KDJ cross in the candidate's direction disqualifies an
/// otherwise-threshold-clearing score.
fn in_no_mans_land(f: &Factors) -> bool {
    (40.0..=60.0).contains(&f.rsi_now)
}

/// Applies the decision rule (spec §4.5): BUY first, then SELL, else HOLD.
pub fn decide(f: &Factors) -> (Action, f64) {
    let buy = buy_score(f);
    if buy >= THRESHOLD && !(in_no_mans_land(f) && !f.macd_g && !f.kdj_bull) {
        return (Action::Buy, buy);
    }
    let sell = sell_score(f);
    if sell >= THRESHOLD && !(in_no_mans_land(f) && !f.macd_d && !f.kdj_bear) {
        return (Action::Sell, sell);
    }
    (Action::Hold, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_bullish() -> Factors {
        Factors {
            bull_ma: true,
            bear_ma: false,
            rsi_bull: true,
            rsi_bear: false,
            macd_g: true,
            macd_d: false,
            kdj_bull: true,
            kdj_bear: false,
            vol_conf: true,
            oi_up: true,
            breakout: true,
            breakdown: false,
            rsi_now: 62.0,
        }
    }

    #[test]
    fn fully_bullish_factor_set_scores_a_perfect_one() {
        let f = all_bullish();
        assert!((buy_score(&f) - 1.0).abs() < 1e-9);
        assert_eq!(decide(&f), (Action::Buy, 1.0));
    }

    #[test]
    fn no_mans_land_vetoes_a_threshold_clearing_buy_score() {
        let mut f = all_bullish();
        f.macd_g = false;
        f.kdj_bull = false;
        f.rsi_now = 50.0;
        // bull_ma(0.25) + rsi_bull(0.15) + vol_conf(0.10) + oi_up(0.10) + breakout(0.05) = 0.65
        assert!(buy_score(&f) >= THRESHOLD);
        assert_eq!(decide(&f).0, Action::Hold);
    }

    #[test]
    fn below_threshold_holds() {
        let f = Factors {
            bull_ma: true,
            bear_ma: false,
            rsi_bull: false,
            rsi_bear: false,
            macd_g: false,
            macd_d: false,
            kdj_bull: false,
            kdj_bear: false,
            vol_conf: false,
            oi_up: false,
            breakout: false,
            breakdown: false,
            rsi_now: 50.0,
        };
        assert_eq!(decide(&f), (Action::Hold, 0.0));
    }
}
