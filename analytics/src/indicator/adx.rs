// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Wilder-smoothed Average Directional Index.

use autotrader_markets::Bar;

fn wilder_smooth(values: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if values.len() < n || n == 0 {
        return out;
    }
    let mut acc = values[..n].iter().sum::<f64>();
    out[n - 1] = acc;
    for i in n..values.len() {
        acc = acc - acc / n as f64 + values[i];
        out[i] = acc;
    }
    out
}

/// `ADX(n)`: Wilder-smoothed directional movement index, scale-invariant
/// (it operates on ratios of directional movement to true range).
pub fn adx(bars: &[Bar], n: usize) -> Vec<f64> {
    let len = bars.len();
    let mut out = vec![f64::NAN; len];
    if len < 2 * n + 1 {
        return out;
    }

    let mut plus_dm = vec![0.0; len];
    let mut minus_dm = vec![0.0; len];
    let mut tr = vec![0.0; len];

    for i in 1..len {
        let up_move = bars[i].high - bars[i - 1].high;
        let down_move = bars[i - 1].low - bars[i].low;
        plus_dm[i] = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        minus_dm[i] = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };
        let prev_close = bars[i - 1].close;
        tr[i] = (bars[i].high - bars[i].low)
            .max((bars[i].high - prev_close).abs())
            .max((bars[i].low - prev_close).abs());
    }

    let smooth_tr = wilder_smooth(&tr[1..], n);
    let smooth_plus = wilder_smooth(&plus_dm[1..], n);
    let smooth_minus = wilder_smooth(&minus_dm[1..], n);

    let mut dx = vec![f64::NAN; smooth_tr.len()];
    for i in 0..smooth_tr.len() {
        if smooth_tr[i].is_nan() || smooth_tr[i] == 0.0 {
            continue;
        }
        let plus_di = 100.0 * smooth_plus[i] / smooth_tr[i];
        let minus_di = 100.0 * smooth_minus[i] / smooth_tr[i];
        let sum = plus_di + minus_di;
        if sum > 0.0 {
            dx[i] = 100.0 * (plus_di - minus_di).abs() / sum;
        }
    }

    let adx_smoothed = wilder_smooth_average(&dx, n);
    // dx[0..] corresponds to bars[1..]; shift back into `out` aligned with bars.
    for (i, value) in adx_smoothed.into_iter().enumerate() {
        out[i + 1] = value;
    }
    out
}

/// ADX itself is a Wilder *average* (not a running sum) of DX: first value
/// is a plain mean of the first `n` DX readings, then exponentially smoothed.
fn wilder_smooth_average(dx: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; dx.len()];
    let first_valid = dx.iter().position(|v| !v.is_nan());
    let Some(start) = first_valid else {
        return out;
    };
    if dx.len() < start + n {
        return out;
    }
    let seed = dx[start..start + n].iter().sum::<f64>() / n as f64;
    out[start + n - 1] = seed;
    let mut prev = seed;
    for i in (start + n)..dx.len() {
        if dx[i].is_nan() {
            continue;
        }
        let smoothed = (prev * (n - 1) as f64 + dx[i]) / n as f64;
        out[i] = smoothed;
        prev = smoothed;
    }
    out
}

pub fn adx_latest(bars: &[Bar], n: usize) -> f64 {
    adx(bars, n).last().copied().unwrap_or(f64::NAN)
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
    fn strong_trend_yields_high_adx() {
        let bars: Vec<Bar> = (0..40)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                bar(i, base + 1.0, base - 1.0, base)
            })
            .collect();
        let value = adx_latest(&bars, 14);
        assert!(value > 30.0, "expected trending ADX, got {value}");
    }

    #[test]
    fn flat_series_yields_low_adx() {
        let bars: Vec<Bar> = (0..40).map(|i| bar(i, 100.5, 99.5, 100.0)).collect();
        let value = adx_latest(&bars, 14);
        assert!(value < 15.0, "expected flat ADX, got {value}");
    }

    #[test]
    fn scale_invariant_under_price_multiplier() {
        let bars: Vec<Bar> = (0..40)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.7).sin() * 3.0 + i as f64 * 0.3;
                bar(i, base + 1.0, base - 1.0, base)
            })
            .collect();
        let scaled: Vec<Bar> = bars
            .iter()
            .map(|b| bar(0, b.high * 5.0, b.low * 5.0, b.close * 5.0))
            .collect();
        let base_value = adx_latest(&bars, 14);
        let scaled_value = adx_latest(&scaled, 14);
        assert!((base_value - scaled_value).abs() < 1e-6);
    }
}
