// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! KDJ(9, 3, 3) stochastic oscillator, required by the intraday 7-factor
//! signal (spec §4.5) though not separately named in the indicator-library
//! section — grounded on the same Wilder/EMA-style smoothing as RSI/MACD.

use autotrader_markets::Bar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdjPoint {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

/// RSV-based KDJ with the conventional smoothing factor of `1/3` for K and D.
pub fn kdj(bars: &[Bar], n: usize, k_smooth: usize, d_smooth: usize) -> Vec<KdjPoint> {
    let len = bars.len();
    let mut out = vec![
        KdjPoint {
            k: f64::NAN,
            d: f64::NAN,
            j: f64::NAN,
        };
        len
    ];
    if len < n || n == 0 {
        return out;
    }

    let k_alpha = 1.0 / k_smooth.max(1) as f64;
    let d_alpha = 1.0 / d_smooth.max(1) as f64;

    let mut k_prev = 50.0;
    let mut d_prev = 50.0;
    for i in (n - 1)..len {
        let window = &bars[i + 1 - n..=i];
        let hh = window.iter().fold(f64::NEG_INFINITY, |m, b| m.max(b.high));
        let ll = window.iter().fold(f64::INFINITY, |m, b| m.min(b.low));
        let rsv = if hh > ll {
            (bars[i].close - ll) / (hh - ll) * 100.0
        } else {
            50.0
        };
        let k = k_alpha * rsv + (1.0 - k_alpha) * k_prev;
        let d = d_alpha * k + (1.0 - d_alpha) * d_prev;
        let j = 3.0 * k - 2.0 * d;
        out[i] = KdjPoint { k, d, j };
        k_prev = k;
        d_prev = d;
    }
    out
}

pub fn kdj_latest(bars: &[Bar]) -> KdjPoint {
    kdj(bars, 9, 3, 3).last().copied().unwrap_or(KdjPoint {
        k: f64::NAN,
        d: f64::NAN,
        j: f64::NAN,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(i: i64, h: f64, l: f64, c: f64) -> Bar {
        Bar {
            datetime: Utc.timestamp_opt(i * 300, 0).unwrap(),
            open: c,
            high: h,
            low: l,
            close: c,
            volume: 1.0,
            open_interest: None,
        }
    }

    #[test]
    fn close_at_high_of_range_pushes_k_up() {
        let bars: Vec<Bar> = (0..15).map(|i| bar(i, 110.0, 90.0, 109.0)).collect();
        let point = kdj_latest(&bars);
        assert!(point.k > 50.0);
    }

    #[test]
    fn warmup_window_is_nan() {
        let bars: Vec<Bar> = (0..5).map(|i| bar(i, 110.0, 90.0, 100.0)).collect();
        let point = kdj_latest(&bars);
        assert!(point.k.is_nan());
    }
}
