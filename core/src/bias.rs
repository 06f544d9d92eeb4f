// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `BiasCache`: per-symbol AI directional bias plus its last-refreshed
//! timestamp (spec §3's daily risk state `ai_bias_by_symbol` /
//! `ai_bias_last_refreshed_at`, kept here rather than in the daily risk
//! state since it survives a date rollover — only the refresh cadence,
//! not the calendar, gates it).

use std::collections::HashMap;

use autotrader_markets::Bias;
use chrono::{DateTime, Utc};

/// A refresh is due no more often than every 1800s per symbol (spec §4.5).
pub const REFRESH_INTERVAL_SECS: i64 = 1800;

#[derive(Debug, Clone, Copy)]
struct Entry {
    bias: Bias,
    refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct BiasCache {
    entries: HashMap<String, Entry>,
}

impl BiasCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored bias for `symbol`, or `Neutral` if never refreshed.
    pub fn get(&self, symbol: &str) -> Bias {
        self.entries.get(symbol).map(|e| e.bias).unwrap_or_default()
    }

    /// Whether `symbol` is due for a refresh: never refreshed, or its last
    /// refresh is older than [`REFRESH_INTERVAL_SECS`].
    pub fn is_due(&self, symbol: &str, now: DateTime<Utc>) -> bool {
        match self.entries.get(symbol) {
            None => true,
            Some(entry) => (now - entry.refreshed_at).num_seconds() >= REFRESH_INTERVAL_SECS,
        }
    }

    /// Records a successful refresh. A failed refresh (oracle error) must
    /// not call this — the previous bias and its timestamp stay in place,
    /// so the next scan retries on the regular window (spec §4.5: "failures
    /// leave the previous bias in place").
    pub fn set(&mut self, symbol: &str, bias: Bias, now: DateTime<Utc>) {
        self.entries.insert(
            symbol.to_string(),
            Entry {
                bias,
                refreshed_at: now,
            },
        );
    }

    pub fn snapshot(&self) -> HashMap<String, Bias> {
        self.entries.iter().map(|(symbol, entry)| (symbol.clone(), entry.bias)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn unrefreshed_symbol_is_due_and_neutral() {
        let cache = BiasCache::new();
        assert!(cache.is_due("C2605", t(0)));
        assert_eq!(cache.get("C2605"), Bias::Neutral);
    }

    #[test]
    fn a_fresh_refresh_is_not_due_again_immediately() {
        let mut cache = BiasCache::new();
        cache.set("C2605", Bias::LongBias, t(1000));
        assert!(!cache.is_due("C2605", t(1000 + REFRESH_INTERVAL_SECS - 1)));
        assert!(cache.is_due("C2605", t(1000 + REFRESH_INTERVAL_SECS)));
        assert_eq!(cache.get("C2605"), Bias::LongBias);
    }

    #[test]
    fn a_failed_refresh_leaves_the_previous_bias_untouched() {
        let mut cache = BiasCache::new();
        cache.set("C2605", Bias::ShortBias, t(0));
        // Caller simply does not call `set` again on failure.
        assert_eq!(cache.get("C2605"), Bias::ShortBias);
        assert!(!cache.is_due("C2605", t(100)));
    }
}
