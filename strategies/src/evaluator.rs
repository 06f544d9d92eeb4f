// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! The signal evaluator facade the scheduler calls into (spec §4.5, §4.8):
//! `evaluate_intraday` runs the full two-layer pipeline over 5-minute bars;
//! `evaluate_swing` consults the AI bias oracle directly with no local layer.

use autotrader_analytics::indicator::{adx_latest, htf_trend_latest};
use autotrader_markets::{Action, Bar, Bias};

use crate::alignment;
use crate::composite;
use crate::factors;

/// ADX lookback used by the alignment gate (spec §4.5: `ADX(14)`).
const ADX_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub action: Action,
    pub score: f64,
    /// Set when an otherwise-valid local signal was vetoed by an alignment
    /// gate, naming which one (`"htf_trend"`, `"adx_floor"`, `"ai_bias"`).
    pub veto: Option<&'static str>,
}

/// Runs Layer B over `bars_5m` then the v6 alignment gates against `bias`
/// (spec §4.5). Returns `HOLD` with no veto when there aren't enough bars
/// for the factor set to warm up.
pub fn evaluate_intraday(bars_5m: &[Bar], bias: Bias) -> Evaluation {
    let Some(local_factors) = factors::compute(bars_5m) else {
        return Evaluation {
            action: Action::Hold,
            score: 0.0,
            veto: None,
        };
    };
    let local = composite::decide(&local_factors);
    let htf_trend = htf_trend_latest(bars_5m);
    // NaN during ADX warmup reads as "below the entry floor", not "aligned".
    let adx = adx_latest(bars_5m, ADX_PERIOD);
    let adx_or_zero = if adx.is_nan() { 0.0 } else { adx };
    let (decision, veto) = alignment::apply(local, htf_trend, adx_or_zero, bias);
    Evaluation {
        action: decision.0,
        score: decision.1,
        veto,
    }
}

/// Swing mode consults only the AI bias directly (spec §4.8: "no fast local
/// layer"): `LongBias -> Buy`, `ShortBias -> Sell`, `Neutral -> Hold`.
pub fn evaluate_swing(bias: Bias) -> Evaluation {
    let action = match bias {
        Bias::LongBias => Action::Buy,
        Bias::ShortBias => Action::Sell,
        Bias::Neutral => Action::Hold,
    };
    Evaluation {
        action,
        score: 0.0,
        veto: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(i: i64, base: f64) -> Bar {
        Bar {
            datetime: Utc.timestamp_opt(i * 300, 0).unwrap(),
            open: base,
            high: base + 0.5,
            low: base - 0.5,
            close: base,
            volume: 1.0,
            open_interest: None,
        }
    }

    #[test]
    fn too_few_bars_holds_without_a_veto() {
        let bars: Vec<Bar> = (0..5).map(|i| bar(i, 100.0)).collect();
        let eval = evaluate_intraday(&bars, Bias::Neutral);
        assert_eq!(eval.action, Action::Hold);
        assert_eq!(eval.veto, None);
    }

    #[test]
    fn swing_mode_follows_bias_directly() {
        assert_eq!(evaluate_swing(Bias::LongBias).action, Action::Buy);
        assert_eq!(evaluate_swing(Bias::ShortBias).action, Action::Sell);
        assert_eq!(evaluate_swing(Bias::Neutral).action, Action::Hold);
    }
}
