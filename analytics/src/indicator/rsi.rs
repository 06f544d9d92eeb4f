// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Wilder's smoothed Relative Strength Index.

use autotrader_markets::Bar;

/// `RSI(n)`: Wilder's smoothed RSI, with gain/loss exponentially smoothed
/// using factor `1/n`. Returns `NaN` until `n` closes have accumulated.
pub fn rsi(bars: &[Bar], n: usize) -> Vec<f64> {
    let len = bars.len();
    let mut out = vec![f64::NAN; len];
    if len < n + 1 || n == 0 {
        return out;
    }

    let changes: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();

    let mut avg_gain = changes[..n].iter().map(|d| d.max(0.0)).sum::<f64>() / n as f64;
    let mut avg_loss = changes[..n].iter().map(|d| (-d).max(0.0)).sum::<f64>() / n as f64;
    out[n] = rsi_from_averages(avg_gain, avg_loss);

    for (i, change) in changes.iter().enumerate().skip(n) {
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (n - 1) as f64 + gain) / n as f64;
        avg_loss = (avg_loss * (n - 1) as f64 + loss) / n as f64;
        out[i + 1] = rsi_from_averages(avg_gain, avg_loss);
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

pub fn rsi_latest(bars: &[Bar], n: usize) -> f64 {
    rsi(bars, n).last().copied().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar_close(i: i64, c: f64) -> Bar {
        Bar {
            datetime: Utc.timestamp_opt(i * 300, 0).unwrap(),
            open: c,
            high: c,
            low: c,
            close: c,
            volume: 1.0,
            open_interest: None,
        }
    }

    #[test]
    fn monotonically_rising_series_pushes_rsi_toward_100() {
        let bars: Vec<Bar> = (0..20).map(|i| bar_close(i, 100.0 + i as f64)).collect();
        let value = rsi_latest(&bars, 6);
        assert!(value > 90.0, "expected strong RSI, got {value}");
    }

    #[test]
    fn scale_invariant_to_price_series_multiplier() {
        let bars: Vec<Bar> = (0..20)
            .map(|i| bar_close(i, 100.0 + (i as f64 * 1.3).sin() * 5.0))
            .collect();
        let scaled: Vec<Bar> = bars.iter().map(|b| bar_close(0, b.close * 10.0)).collect();
        let base = rsi_latest(&bars, 6);
        let scaled_val = rsi_latest(&scaled, 6);
        assert!((base - scaled_val).abs() < 1e-6);
    }
}
