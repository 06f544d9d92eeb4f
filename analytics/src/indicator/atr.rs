// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Average True Range.

use autotrader_markets::Bar;

/// `ATR(n)`: simple moving average over `n` bars of true range, where
/// `true_range = max(high - low, |high - prev_close|, |low - prev_close|)`.
///
/// Returns one value per input bar; bars before the warmup window (the
/// first bar, which has no previous close, and bars before `n` true ranges
/// have accumulated) are `NaN`.
pub fn atr(bars: &[Bar], n: usize) -> Vec<f64> {
    if bars.is_empty() || n == 0 {
        return vec![f64::NAN; bars.len()];
    }

    let mut true_ranges = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let tr = if i == 0 {
            f64::NAN
        } else {
            let prev_close = bars[i - 1].close;
            (bar.high - bar.low)
                .max((bar.high - prev_close).abs())
                .max((bar.low - prev_close).abs())
        };
        true_ranges.push(tr);
    }

    let mut out = vec![f64::NAN; bars.len()];
    for i in 0..bars.len() {
        if i + 1 < n {
            continue;
        }
        let window = &true_ranges[i + 1 - n..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = window.iter().sum::<f64>() / n as f64;
    }
    out
}

/// Convenience: ATR of the latest bar only, or `NaN` if warmup isn't satisfied.
pub fn atr_latest(bars: &[Bar], n: usize) -> f64 {
    atr(bars, n).last().copied().unwrap_or(f64::NAN)
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
    fn warmup_window_is_nan() {
        let bars = vec![bar(0, 10.0, 9.0, 9.5), bar(1, 11.0, 10.0, 10.5)];
        let out = atr(&bars, 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
    }

    #[test]
    fn scale_equivariant_with_price_series() {
        let bars: Vec<Bar> = (0..20)
            .map(|i| bar(i, 100.0 + i as f64 % 3.0, 98.0, 99.0 + i as f64 % 2.0))
            .collect();
        let scaled: Vec<Bar> = bars
            .iter()
            .map(|b| Bar {
                high: b.high * 2.0,
                low: b.low * 2.0,
                close: b.close * 2.0,
                ..*b
            })
            .collect();
        let base = atr_latest(&bars, 14);
        let doubled = atr_latest(&scaled, 14);
        assert!((doubled - base * 2.0).abs() < 1e-9);
    }
}
