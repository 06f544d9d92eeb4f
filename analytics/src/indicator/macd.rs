// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! MACD(12, 26, 9): EMA12 - EMA26 as the MACD line (DIF), a 9-period EMA of
//! that line as the signal (DEA), and their difference as the histogram.

use autotrader_markets::Bar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub dif: f64,
    pub dea: f64,
    pub histogram: f64,
}

fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if values.len() < period || period == 0 {
        return out;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = seed;
    for i in period..values.len() {
        out[i] = values[i] * k + out[i - 1] * (1.0 - k);
    }
    out
}

pub fn macd(bars: &[Bar], fast: usize, slow: usize, signal: usize) -> Vec<MacdPoint> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema(&closes, fast);
    let ema_slow = ema(&closes, slow);

    let dif: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();

    // The signal EMA only seeds once DIF itself has `signal` finite values.
    let first_valid = dif.iter().position(|v| !v.is_nan());
    let dea = match first_valid {
        Some(start) => {
            let mut out = vec![f64::NAN; dif.len()];
            let tail = &dif[start..];
            let tail_ema = ema(tail, signal);
            out[start..].copy_from_slice(&tail_ema);
            out
        }
        None => vec![f64::NAN; dif.len()],
    };

    dif.into_iter()
        .zip(dea)
        .map(|(dif, dea)| MacdPoint {
            dif,
            dea,
            histogram: dif - dea,
        })
        .collect()
}

pub fn macd_latest(bars: &[Bar]) -> MacdPoint {
    macd(bars, 12, 26, 9)
        .last()
        .copied()
        .unwrap_or(MacdPoint {
            dif: f64::NAN,
            dea: f64::NAN,
            histogram: f64::NAN,
        })
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
    fn uptrend_produces_positive_dif() {
        let bars: Vec<Bar> = (0..60).map(|i| bar_close(i, 100.0 + i as f64 * 0.5)).collect();
        let point = macd_latest(&bars);
        assert!(point.dif > 0.0);
    }

    #[test]
    fn short_series_is_nan() {
        let bars: Vec<Bar> = (0..5).map(|i| bar_close(i, 100.0)).collect();
        let point = macd_latest(&bars);
        assert!(point.dif.is_nan());
    }
}
