// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Layer B — the 7-factor intraday composite score over 5-minute bars
//! (spec §4.5). Each factor is a boolean predicate comparing the latest bar
//! `b_k` against the one before it, `b_{k-1}`.

use autotrader_analytics::indicator::{kdj_latest, ma_close, ma_volume, macd, rsi, KdjPoint};
use autotrader_markets::Bar;

/// Minimum bars needed for every factor to read a real value rather than
/// `NaN` (MACD's 26-period EMA plus its 9-period signal is the tallest
/// warmup requirement).
pub const MIN_BARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factors {
    pub bull_ma: bool,
    pub bear_ma: bool,
    pub rsi_bull: bool,
    pub rsi_bear: bool,
    pub macd_g: bool,
    pub macd_d: bool,
    pub kdj_bull: bool,
    pub kdj_bear: bool,
    pub vol_conf: bool,
    pub oi_up: bool,
    pub breakout: bool,
    pub breakdown: bool,
    /// RSI(6) at `b_k`, carried through for the alignment veto band.
    pub rsi_now: f64,
}

/// Computes the 7-factor set from the tail of `bars`. Returns `None` if
/// fewer than [`MIN_BARS`] bars are available — the caller should treat
/// that as `HOLD` rather than evaluate on partially-warmed indicators.
pub fn compute(bars: &[Bar]) -> Option<Factors> {
    if bars.len() < MIN_BARS {
        return None;
    }

    let ma5 = ma_close(bars, 5);
    let ma10 = ma_close(bars, 10);
    let ma20 = ma_close(bars, 20);
    let vol_ma20 = ma_volume(bars, 20);
    let rsi6 = rsi(bars, 6);
    let macd_points = macd(bars, 12, 26, 9);

    let k = bars.len() - 1;
    let prev = k - 1;

    let bull_ma = ma5[k] > ma10[k] && ma10[k] > ma20[k];
    let bear_ma = ma5[k] < ma10[k] && ma10[k] < ma20[k];

    let rsi_k = rsi6[k];
    let rsi_prev = rsi6[prev];
    let rsi_bull = (rsi_prev < 35.0 && rsi_k > 35.0) || rsi_k < 30.0;
    let rsi_bear = (rsi_prev > 65.0 && rsi_k < 65.0) || rsi_k > 70.0;

    let dif_k = macd_points[k].dif;
    let dea_k = macd_points[k].dea;
    let dif_prev = macd_points[prev].dif;
    let dea_prev = macd_points[prev].dea;
    let macd_g = dif_prev <= dea_prev && dif_k > dea_k;
    let macd_d = dif_prev >= dea_prev && dif_k < dea_k;

    let KdjPoint { k: kdj_k, d: d_k, j: j_k } = kdj_latest(&bars[..=k]);
    let KdjPoint { k: kdj_prev, d: d_prev, .. } = kdj_latest(&bars[..=prev]);
    let kdj_bull = (kdj_prev <= d_prev && kdj_k > d_k) || j_k < 0.0;
    let kdj_bear = (kdj_prev >= d_prev && kdj_k < d_k) || j_k > 100.0;

    let vol_conf = bars[k].volume > 1.2 * vol_ma20[k];

    let oi_up = if k >= 5 {
        match (bars[k].open_interest, bars[k - 5].open_interest) {
            (Some(oi_k), Some(oi_prev5)) if oi_prev5 != 0.0 => oi_k > 1.005 * oi_prev5,
            _ => false,
        }
    } else {
        false
    };

    let breakout = bars[k].close > bars[prev].high;
    let breakdown = bars[k].close < bars[prev].low;

    Some(Factors {
        bull_ma,
        bear_ma,
        rsi_bull,
        rsi_bear,
        macd_g,
        macd_d,
        kdj_bull,
        kdj_bear,
        vol_conf,
        oi_up,
        breakout,
        breakdown,
        rsi_now: rsi_k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(i: i64, h: f64, l: f64, c: f64, v: f64) -> Bar {
        Bar {
            datetime: Utc.timestamp_opt(i * 300, 0).unwrap(),
            open: c,
            high: h,
            low: l,
            close: c,
            volume: v,
            open_interest: None,
        }
    }

    #[test]
    fn short_series_returns_none() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 101.0, 99.0, 100.0, 1.0)).collect();
        assert!(compute(&bars).is_none());
    }

    #[test]
    fn sustained_uptrend_reads_bullish_ma_and_breakout() {
        let bars: Vec<Bar> = (0..MIN_BARS as i64 + 5)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.8;
                bar(i, base + 0.5, base - 0.5, base, 1.0)
            })
            .collect();
        let factors = compute(&bars).unwrap();
        assert!(factors.bull_ma);
        assert!(!factors.bear_ma);
        assert!(factors.breakout);
    }
}
