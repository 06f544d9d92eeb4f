// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! K-line (OHLCV bar) series and the keys used to cache them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV bar. `open_interest` is only populated by exchanges that
/// report it on the K-line stream (not all do).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub open_interest: Option<f64>,
}

/// Bar duration in seconds. Spec names four concrete durations; this is a
/// thin newtype so callers can't accidentally pass a raw bar count where a
/// duration was expected (or vice versa).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Duration(pub u32);

impl Duration {
    pub const M5: Duration = Duration(300);
    pub const M15: Duration = Duration(900);
    pub const M30: Duration = Duration(1800);
    pub const D1: Duration = Duration(86_400);
}

/// Key identifying a cached K-line series: `(symbol, duration, count)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub symbol: String,
    pub duration: Duration,
    pub count: usize,
}

impl SeriesKey {
    pub fn new(symbol: impl Into<String>, duration: Duration, count: usize) -> Self {
        Self {
            symbol: symbol.into(),
            duration,
            count,
        }
    }
}

/// An ordered bar sequence, oldest first.
pub type Series = Vec<Bar>;

/// Resamples a series into `bucket_seconds`-wide bars:
/// `{open=first, high=max, low=min, close=last, volume=sum}`, per spec §4.2.
///
/// Buckets are wall-clock, not positional: each bar is assigned to the
/// bucket its own `datetime` falls in (`timestamp / bucket_seconds`), so a
/// session gap (e.g. the Chinese morning tea break, 10:15–10:30) yields a
/// short trailing bucket instead of silently merging bars from opposite
/// sides of the gap into one synthetic bar.
pub fn resample(bars: &[Bar], bucket_seconds: i64) -> Series {
    if bucket_seconds <= 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut bucket_id: Option<i64> = None;
    let mut open = 0.0;
    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    let mut close = 0.0;
    let mut volume = 0.0;
    let mut last_dt = Utc::now();
    let mut last_oi = None;

    for bar in bars {
        let id = bar.datetime.timestamp().div_euclid(bucket_seconds);
        if bucket_id != Some(id) {
            if bucket_id.is_some() {
                out.push(Bar {
                    datetime: last_dt,
                    open,
                    high,
                    low,
                    close,
                    volume,
                    open_interest: last_oi,
                });
            }
            bucket_id = Some(id);
            open = bar.open;
            high = f64::NEG_INFINITY;
            low = f64::INFINITY;
            volume = 0.0;
        }
        high = high.max(bar.high);
        low = low.min(bar.low);
        close = bar.close;
        volume += bar.volume;
        last_dt = bar.datetime;
        last_oi = bar.open_interest;
    }
    if bucket_id.is_some() {
        out.push(Bar {
            datetime: last_dt,
            open,
            high,
            low,
            close,
            volume,
            open_interest: last_oi,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(i: i64, o: f64, h: f64, l: f64, c: f64, v: f64) -> Bar {
        Bar {
            datetime: Utc.timestamp_opt(i * 300, 0).unwrap(),
            open: o,
            high: h,
            low: l,
            close: c,
            volume: v,
            open_interest: None,
        }
    }

    #[test]
    fn resample_6_five_minute_bars_to_one_30m_bar() {
        let bars: Vec<Bar> = (0..6)
            .map(|i| bar(i, 100.0 + i as f64, 105.0 + i as f64, 95.0, 101.0 + i as f64, 10.0))
            .collect();
        let resampled = resample(&bars, 1800);
        assert_eq!(resampled.len(), 1);
        let b = resampled[0];
        assert_eq!(b.open, bars[0].open);
        assert_eq!(b.close, bars[5].close);
        assert_eq!(b.volume, 60.0);
        assert!((b.high - 110.0).abs() < 1e-9);
        assert_eq!(b.low, 95.0);
    }

    /// Morning session bars at 09:00..=10:10 (15 bars) followed by a
    /// 10:15-10:30 tea break, then the post-break bar at 10:30. The break
    /// must not merge the trailing 3-bar partial bucket (10:00-10:10) with
    /// the bar on the other side of the gap.
    #[test]
    fn session_gap_does_not_merge_across_the_tea_break() {
        let minute = |h: i64, m: i64| Utc.timestamp_opt(h * 3600 + m * 60, 0).unwrap();
        let mut bars = Vec::new();
        let mut t = 9 * 60; // minutes since midnight
        while t < 10 * 60 + 15 {
            bars.push(Bar {
                datetime: minute(t / 60, t % 60),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: 1.0,
                open_interest: None,
            });
            t += 5;
        }
        bars.push(Bar {
            datetime: minute(10, 30),
            open: 200.0,
            high: 201.0,
            low: 199.0,
            close: 200.0,
            volume: 1.0,
            open_interest: None,
        });

        let resampled = resample(&bars, 1800);
        // buckets: [09:00,09:30) 6 bars, [09:30,10:00) 6 bars,
        // [10:00,10:30) 3 bars (10:00/10:05/10:10), [10:30,11:00) 1 bar.
        assert_eq!(resampled.len(), 4);
        let pre_break = &resampled[2];
        assert_eq!(pre_break.close, 100.0);
        assert_eq!(pre_break.high, 101.0);
        let post_break = &resampled[3];
        assert_eq!(post_break.open, 200.0);
        assert_eq!(post_break.close, 200.0);
    }
}
