// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Higher-timeframe trend gate: resample 5-minute bars up to 30-minute bars,
//! tag each 30-minute bar +1/-1/0 by its MA5/MA10 alignment, then forward-fill
//! that tag back onto the 5-minute index so every intraday bar carries a
//! synchronized higher-timeframe read.

use autotrader_markets::kline::resample;
use autotrader_markets::Bar;

use super::ma::ma_close;

const RESAMPLE_BUCKET_SECONDS: i64 = 1800; // 30-minute wall-clock bucket

/// +1 bullish alignment, -1 bearish alignment, 0 no alignment (chop).
pub fn htf_trend_30m(bars_30m: &[Bar]) -> Vec<i8> {
    let ma5 = ma_close(bars_30m, 5);
    let ma10 = ma_close(bars_30m, 10);
    bars_30m
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if ma5[i].is_nan() || ma10[i].is_nan() {
                return 0;
            }
            if bar.close > ma5[i] && ma5[i] > ma10[i] {
                1
            } else if bar.close < ma5[i] && ma5[i] < ma10[i] {
                -1
            } else {
                0
            }
        })
        .collect()
}

/// Resamples `bars_5m` into 30-minute bars, tags each with [`htf_trend_30m`],
/// and forward-fills the tag back onto the original 5-minute index. Bars
/// before the first completed 30-minute bar read as `0`.
pub fn htf_trend(bars_5m: &[Bar]) -> Vec<i8> {
    let bars_30m = resample(bars_5m, RESAMPLE_BUCKET_SECONDS);
    let tags_30m = htf_trend_30m(&bars_30m);

    let mut out = vec![0i8; bars_5m.len()];
    let mut tag_idx = 0usize;
    let mut current_tag = 0i8;
    for (i, bar) in bars_5m.iter().enumerate() {
        while tag_idx < bars_30m.len() && bars_30m[tag_idx].datetime <= bar.datetime {
            current_tag = tags_30m[tag_idx];
            tag_idx += 1;
        }
        out[i] = current_tag;
    }
    out
}

pub fn htf_trend_latest(bars_5m: &[Bar]) -> i8 {
    htf_trend(bars_5m).last().copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar5(i: i64, c: f64) -> Bar {
        Bar {
            datetime: Utc.timestamp_opt(i * 300, 0).unwrap(),
            open: c,
            high: c + 0.5,
            low: c - 0.5,
            close: c,
            volume: 1.0,
            open_interest: None,
        }
    }

    #[test]
    fn sustained_uptrend_tags_bullish() {
        // 90 five-minute bars = 15 thirty-minute bars, rising closes throughout.
        let bars: Vec<Bar> = (0..90).map(|i| bar5(i, 100.0 + i as f64 * 0.3)).collect();
        let trend = htf_trend_latest(&bars);
        assert_eq!(trend, 1);
    }

    #[test]
    fn flat_series_has_no_alignment() {
        let bars: Vec<Bar> = (0..90).map(|i| bar5(i, 100.0)).collect();
        let trend = htf_trend_latest(&bars);
        assert_eq!(trend, 0);
    }

    #[test]
    fn early_bars_before_first_30m_close_are_neutral() {
        let bars: Vec<Bar> = (0..3).map(|i| bar5(i, 100.0 + i as f64)).collect();
        let trend = htf_trend(&bars);
        assert!(trend.iter().all(|&t| t == 0));
    }
}
