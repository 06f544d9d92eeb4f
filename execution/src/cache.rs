// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Shared caches written by the broker worker and read lock-free by every
//! other thread (spec §4.3). Only whole values are ever swapped in — no
//! reader can observe a partially updated quote or series.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use autotrader_markets::kline::Bar;
use autotrader_markets::{AccountInfo, BrokerPosition, Quote};
use parking_lot::RwLock;

/// Upper bound on bars retained per `(symbol, duration_secs)` series; older
/// bars are dropped once a fresh one arrives past this length.
const MAX_CACHED_BARS: usize = 1_000;

#[derive(Debug, Default)]
pub struct MarketDataCaches {
    quotes: RwLock<HashMap<String, Quote>>,
    klines: RwLock<HashMap<(String, u32), Vec<Bar>>>,
    atr: RwLock<HashMap<(String, u32, usize), f64>>,
    positions: RwLock<HashMap<String, BrokerPosition>>,
    account: RwLock<Option<AccountInfo>>,
    ready: AtomicBool,
}

impl MarketDataCaches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    pub fn put_quote(&self, symbol: &str, quote: Quote) {
        self.quotes.write().insert(symbol.to_string(), quote);
    }

    pub fn get_quote(&self, symbol: &str) -> Option<Quote> {
        self.quotes.read().get(symbol).copied()
    }

    pub fn push_bar(&self, symbol: &str, duration_secs: u32, bar: Bar) {
        let mut klines = self.klines.write();
        let series = klines.entry((symbol.to_string(), duration_secs)).or_default();
        if let Some(last) = series.last_mut() {
            if last.datetime == bar.datetime {
                *last = bar;
                return;
            }
        }
        series.push(bar);
        if series.len() > MAX_CACHED_BARS {
            let overflow = series.len() - MAX_CACHED_BARS;
            series.drain(0..overflow);
        }
    }

    /// Returns the most recent `count` bars for `(symbol, duration_secs)`,
    /// or `None` if nothing has been cached yet.
    pub fn get_klines(&self, symbol: &str, duration_secs: u32, count: usize) -> Option<Vec<Bar>> {
        let klines = self.klines.read();
        let series = klines.get(&(symbol.to_string(), duration_secs))?;
        if series.is_empty() {
            return None;
        }
        let start = series.len().saturating_sub(count);
        Some(series[start..].to_vec())
    }

    pub fn put_atr(&self, symbol: &str, duration_secs: u32, period: usize, value: f64) {
        self.atr
            .write()
            .insert((symbol.to_string(), duration_secs, period), value);
    }

    pub fn get_atr(&self, symbol: &str, duration_secs: u32, period: usize) -> Option<f64> {
        self.atr.read().get(&(symbol.to_string(), duration_secs, period)).copied()
    }

    pub fn put_position(&self, symbol: &str, position: BrokerPosition) {
        self.positions.write().insert(symbol.to_string(), position);
    }

    pub fn get_position(&self, symbol: &str) -> Option<BrokerPosition> {
        self.positions.read().get(symbol).copied()
    }

    pub fn get_all_positions(&self) -> HashMap<String, BrokerPosition> {
        self.positions.read().clone()
    }

    pub fn put_account(&self, account: AccountInfo) {
        *self.account.write() = Some(account);
    }

    pub fn get_account(&self) -> Option<AccountInfo> {
        *self.account.read()
    }
}
