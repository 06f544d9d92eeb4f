// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! v6 alignment rules (spec §4.5, strict): a local BUY/SELL from
//! [`composite::decide`](crate::composite::decide) only survives if the
//! higher-timeframe trend, ADX, and the stored AI bias all agree with it.

use autotrader_markets::{Action, Bias};

/// ADX readings below this block any entry regardless of direction.
pub const ADX_ENTRY_FLOOR: f64 = 15.0;

/// Re-evaluates a local decision against the three alignment gates, in the
/// order the spec lists them: HTF trend, ADX, then AI bias. Returns the
/// gate name that vetoed the decision, if any, for logging.
pub fn apply(local: (Action, f64), htf_trend: i8, adx: f64, bias: Bias) -> ((Action, f64), Option<&'static str>) {
    let (action, score) = local;
    if !matches!(action, Action::Buy | Action::Sell) {
        return (local, None);
    }
    if adx < ADX_ENTRY_FLOOR {
        return ((Action::Hold, 0.0), Some("adx_floor"));
    }
    match action {
        Action::Buy => {
            if htf_trend != 1 {
                return ((Action::Hold, 0.0), Some("htf_trend"));
            }
            if !bias.allows_buy() {
                return ((Action::Hold, 0.0), Some("ai_bias"));
            }
        }
        Action::Sell => {
            if htf_trend != -1 {
                return ((Action::Hold, 0.0), Some("htf_trend"));
            }
            if !bias.allows_sell() {
                return ((Action::Hold, 0.0), Some("ai_bias"));
            }
        }
        _ => unreachable!("filtered above"),
    }
    ((action, score), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s6_neutral_htf_blocks_an_otherwise_valid_buy() {
        let (decision, veto) = apply((Action::Buy, 0.70), 0, 22.0, Bias::Neutral);
        assert_eq!(decision.0, Action::Hold);
        assert_eq!(veto, Some("htf_trend"));
    }

    #[test]
    fn s6_aligned_htf_and_adx_accepts_the_buy() {
        let (decision, veto) = apply((Action::Buy, 0.70), 1, 22.0, Bias::Neutral);
        assert_eq!(decision, (Action::Buy, 0.70));
        assert_eq!(veto, None);
    }

    #[test]
    fn s6_weak_adx_blocks_even_with_aligned_htf() {
        let (decision, veto) = apply((Action::Buy, 0.70), 1, 13.0, Bias::Neutral);
        assert_eq!(decision.0, Action::Hold);
        assert_eq!(veto, Some("adx_floor"));
    }

    #[test]
    fn short_bias_blocks_a_buy_even_with_aligned_htf_and_adx() {
        let (decision, veto) = apply((Action::Buy, 0.70), 1, 22.0, Bias::ShortBias);
        assert_eq!(decision.0, Action::Hold);
        assert_eq!(veto, Some("ai_bias"));
    }

    #[test]
    fn hold_passes_through_untouched() {
        let (decision, veto) = apply((Action::Hold, 0.0), 0, 5.0, Bias::Neutral);
        assert_eq!(decision, (Action::Hold, 0.0));
        assert_eq!(veto, None);
    }
}
