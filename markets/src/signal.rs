// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Shared vocabulary for entry decisions and the AI directional bias, so that
//! `autotrader-strategies`, `autotrader-risk`, `autotrader-trader` and
//! `autotrader-integration` all agree on one set of tags instead of each
//! crate inventing its own string constants.

use serde::{Deserialize, Serialize};

/// Action attached to a [`TradeDecision`](crate) (defined in
/// `autotrader-integration`, which depends on this enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    CloseLong,
    CloseShort,
    Hold,
}

impl Action {
    pub fn is_entry(self) -> bool {
        matches!(self, Action::Buy | Action::Sell)
    }

    pub fn is_exit(self) -> bool {
        matches!(self, Action::CloseLong | Action::CloseShort)
    }
}

/// Raw directional read reported by the LLM bias oracle (spec §4.5 Layer A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiSignal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

/// The slow-changing directional bias derived from the oracle's signal and
/// composite score (spec §4.5 Layer A mapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Bias {
    LongBias,
    ShortBias,
    #[default]
    Neutral,
}

impl Bias {
    /// Maps an oracle response to a [`Bias`] per spec §4.5:
    /// - `{STRONG_BUY, BUY}` or `composite_score > 0.15` -> `LongBias`
    /// - `{STRONG_SELL, SELL}` or `composite_score < -0.15` -> `ShortBias`
    /// - otherwise -> `Neutral`
    pub fn from_oracle(signal: AiSignal, composite_score: f64) -> Self {
        let clamped = composite_score.clamp(-1.0, 1.0);
        if matches!(signal, AiSignal::StrongBuy | AiSignal::Buy) || clamped > 0.15 {
            Bias::LongBias
        } else if matches!(signal, AiSignal::StrongSell | AiSignal::Sell) || clamped < -0.15 {
            Bias::ShortBias
        } else {
            Bias::Neutral
        }
    }

    /// Whether a local BUY signal is permitted under this bias (spec §4.5
    /// alignment rules: BUY is forbidden only when bias is `ShortBias`).
    pub fn allows_buy(self) -> bool {
        !matches!(self, Bias::ShortBias)
    }

    /// Whether a local SELL signal is permitted under this bias.
    pub fn allows_sell(self) -> bool {
        !matches!(self, Bias::LongBias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_buy_signal_implies_long_bias_regardless_of_score() {
        assert_eq!(Bias::from_oracle(AiSignal::StrongBuy, -0.5), Bias::LongBias);
    }

    #[test]
    fn score_threshold_alone_can_drive_bias() {
        assert_eq!(Bias::from_oracle(AiSignal::Hold, 0.2), Bias::LongBias);
        assert_eq!(Bias::from_oracle(AiSignal::Hold, -0.2), Bias::ShortBias);
        assert_eq!(Bias::from_oracle(AiSignal::Hold, 0.0), Bias::Neutral);
    }

    #[test]
    fn neutral_bias_allows_either_direction() {
        assert!(Bias::Neutral.allows_buy());
        assert!(Bias::Neutral.allows_sell());
        assert!(!Bias::ShortBias.allows_buy());
        assert!(!Bias::LongBias.allows_sell());
    }
}
