// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! [`MarketDataService`]: the public handle every other component uses to
//! reach the broker worker (spec §4.3). All methods here are synchronous —
//! the scheduler and strategy threads are plain OS threads, not async tasks
//! (see the workspace's `tokio` dependency comment) — and poll the caches
//! with short sleeps rather than blocking the worker.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration as StdDuration;

use autotrader_analytics::atr_latest;
use autotrader_broker::{BrokerGateway, Credentials};
use autotrader_integration::DataStore;
use autotrader_markets::kline::{Duration as BarDuration, SeriesKey};
use autotrader_markets::{AccountInfo, BrokerPosition, Offset, Quote, Side};
use tokio::sync::{mpsc, oneshot};

use crate::cache::MarketDataCaches;
use crate::error::ExecutionError;
use crate::order::{OrderResult, OrderResultStatus};
use crate::request::{SubscriptionKey, WorkerCommand};
use crate::worker;

/// Polling cadence used by every getter and by `place_order` while waiting
/// on the worker (spec §4.3: "poll the cache ... 30-50 x 100ms ticks").
const POLL_INTERVAL: StdDuration = StdDuration::from_millis(100);
const GETTER_POLL_ATTEMPTS: u32 = 40;
const ORDER_POLL_ATTEMPTS: u32 = 50;

/// Handle to the running broker worker. Cloning shares the same caches and
/// command queue; only [`MarketDataService::stop`] on the original owner
/// actually tears the worker down.
#[derive(Debug, Clone)]
pub struct MarketDataService {
    caches: Arc<MarketDataCaches>,
    commands: mpsc::UnboundedSender<WorkerCommand>,
    trade_log: Arc<DataStore>,
}

impl MarketDataService {
    /// Starts the worker thread and returns a handle plus its join handle
    /// (joined by the caller on shutdown, spec §5: `join(timeout=30s)`).
    pub fn start(
        gateway: Box<dyn BrokerGateway>,
        creds: Credentials,
        data_dir: impl AsRef<Path>,
    ) -> (Self, JoinHandle<()>) {
        let caches = Arc::new(MarketDataCaches::new());
        let trade_log = Arc::new(DataStore::new(data_dir.as_ref()));
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = worker::spawn(gateway, creds, Arc::clone(&caches), rx, Arc::clone(&trade_log));
        (
            Self {
                caches,
                commands: tx,
                trade_log,
            },
            handle,
        )
    }

    /// Becomes true once the worker has finished broker login.
    pub fn is_ready(&self) -> bool {
        self.caches.is_ready()
    }

    /// The trade-log store the worker appends order acknowledgements to,
    /// shared so the scheduler can write decisions/positions through the
    /// same data directory.
    pub fn trade_log_store(&self) -> Arc<DataStore> {
        Arc::clone(&self.trade_log)
    }

    /// Signals the worker to stop; the caller should then join the handle
    /// returned by [`Self::start`].
    pub fn stop(&self) {
        let _ = self.commands.send(WorkerCommand::Shutdown);
    }

    pub fn get_quote(&self, symbol: &str) -> Option<Quote> {
        if !self.caches.is_ready() {
            return None;
        }
        if let Some(quote) = self.caches.get_quote(symbol) {
            return Some(quote);
        }
        self.enqueue(WorkerCommand::Subscribe(SubscriptionKey::Quote(symbol.to_string())));
        poll(|| self.caches.get_quote(symbol), GETTER_POLL_ATTEMPTS)
    }

    pub fn get_klines(&self, symbol: &str, duration: BarDuration, count: usize) -> Option<Vec<autotrader_markets::kline::Bar>> {
        if !self.caches.is_ready() {
            return None;
        }
        if let Some(series) = self.caches.get_klines(symbol, duration.0, count) {
            if series.len() >= count {
                return Some(series);
            }
        }
        self.enqueue(WorkerCommand::Subscribe(SubscriptionKey::Kline {
            symbol: symbol.to_string(),
            duration,
            count,
        }));
        poll(|| self.caches.get_klines(symbol, duration.0, count), GETTER_POLL_ATTEMPTS)
    }

    /// Returns `ATR(period)` over the given duration's cached series,
    /// recomputing from [`Self::get_klines`] when the period differs from
    /// the worker's pre-computed production period.
    pub fn get_atr(&self, symbol: &str, duration: BarDuration, period: usize) -> Option<f64> {
        if !self.caches.is_ready() {
            return None;
        }
        if let Some(value) = self.caches.get_atr(symbol, duration.0, period) {
            return Some(value);
        }
        let bars = self.get_klines(symbol, duration, period + 50)?;
        let value = atr_latest(&bars, period);
        if value.is_finite() {
            self.caches.put_atr(symbol, duration.0, period, value);
            Some(value)
        } else {
            None
        }
    }

    /// Convenience used by callers that key series by [`SeriesKey`] directly.
    pub fn get_klines_for_key(&self, key: &SeriesKey) -> Option<Vec<autotrader_markets::kline::Bar>> {
        self.get_klines(&key.symbol, key.duration, key.count)
    }

    pub fn get_position_info(&self, symbol: &str) -> Option<BrokerPosition> {
        if !self.caches.is_ready() {
            return None;
        }
        if let Some(pos) = self.caches.get_position(symbol) {
            return Some(pos);
        }
        self.enqueue(WorkerCommand::Subscribe(SubscriptionKey::Position(symbol.to_string())));
        poll(|| self.caches.get_position(symbol), GETTER_POLL_ATTEMPTS)
    }

    pub fn get_all_positions(&self) -> HashMap<String, BrokerPosition> {
        self.caches.get_all_positions()
    }

    pub fn get_account_info(&self) -> Option<AccountInfo> {
        if !self.caches.is_ready() {
            return None;
        }
        self.caches.get_account()
    }

    /// Submits an order and spins for up to ~5s for a terminal status,
    /// returning [`OrderResultStatus::Timeout`] if the worker never reports
    /// one in time (spec §4.3).
    pub fn place_order(
        &self,
        symbol: &str,
        side: Side,
        offset: Offset,
        volume: f64,
        limit_price: Option<f64>,
    ) -> Result<OrderResult, ExecutionError> {
        if !self.caches.is_ready() {
            return Err(ExecutionError::WorkerDown);
        }
        let (reply, mut rx) = oneshot::channel();
        self.enqueue(WorkerCommand::PlaceOrder {
            symbol: symbol.to_string(),
            side,
            offset,
            volume,
            limit_price,
            reply,
        });
        for _ in 0..ORDER_POLL_ATTEMPTS {
            match rx.try_recv() {
                Ok(result) => return Ok(result),
                Err(oneshot::error::TryRecvError::Empty) => std::thread::sleep(POLL_INTERVAL),
                Err(oneshot::error::TryRecvError::Closed) => return Err(ExecutionError::WorkerDown),
            }
        }
        Ok(OrderResult {
            id: 0,
            status: OrderResultStatus::Timeout,
            symbol: symbol.to_string(),
            side,
            offset,
            volume,
            price: limit_price,
            time: chrono::Utc::now(),
            error: None,
        })
    }

    /// Reads current broker LONG/SHORT volumes and emits one or two close
    /// orders accordingly (spec §4.3 close-position helper).
    pub fn close_position(&self, symbol: &str) -> Result<Vec<OrderResult>, ExecutionError> {
        let position = self.get_position_info(symbol).unwrap_or_default();
        let mut results = Vec::new();
        if position.pos_long > 0 {
            results.push(self.place_order(symbol, Side::Sell, Offset::Close, position.pos_long as f64, None)?);
        }
        if position.pos_short > 0 {
            results.push(self.place_order(symbol, Side::Buy, Offset::Close, position.pos_short as f64, None)?);
        }
        Ok(results)
    }

    fn enqueue(&self, cmd: WorkerCommand) {
        let _ = self.commands.send(cmd);
    }
}

fn poll<T>(mut check: impl FnMut() -> Option<T>, attempts: u32) -> Option<T> {
    for _ in 0..attempts {
        if let Some(value) = check() {
            return Some(value);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    check()
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotrader_broker::{Credentials, MockConnector, TradeMode};
    use std::path::PathBuf;

    fn dummy_creds() -> Credentials {
        Credentials {
            user: "demo".into(),
            password: "demo".into(),
            trade_mode: TradeMode::Sim,
            broker_id: String::new(),
            broker_account: String::new(),
            broker_password: String::new(),
        }
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("autotrader-execution-test-{tag}-{}", std::process::id()))
    }

    fn start_service(tag: &str) -> (MarketDataService, std::thread::JoinHandle<()>, PathBuf) {
        std::env::set_var("BROKER_MOCK_INTERVAL_MS", "10");
        let dir = scratch_dir(tag);
        let gateway: Box<dyn BrokerGateway> = Box::new(MockConnector::new().unwrap());
        let (service, handle) = MarketDataService::start(gateway, dummy_creds(), &dir);
        assert!(poll(|| service.is_ready().then_some(()), GETTER_POLL_ATTEMPTS).is_some());
        (service, handle, dir)
    }

    #[test]
    fn becomes_ready_after_login() {
        let (service, handle, dir) = start_service("ready");
        assert!(service.is_ready());
        service.stop();
        handle.join().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn get_quote_subscribes_then_eventually_returns_a_tick() {
        let (service, handle, dir) = start_service("quote");
        let quote = service.get_quote("DCE.c2605");
        assert!(quote.is_some());
        assert!(quote.unwrap().is_usable());
        service.stop();
        handle.join().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn place_order_reports_submitted_and_appends_trade_log() {
        let (service, handle, dir) = start_service("order");
        let result = service
            .place_order("DCE.c2605", Side::Buy, Offset::Open, 1.0, None)
            .unwrap();
        assert_eq!(result.status, OrderResultStatus::Submitted);
        let log = service.trade_log_store().load_trade_log();
        assert_eq!(log.len(), 1);
        service.stop();
        handle.join().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn place_order_rejects_non_positive_volume_as_error() {
        let (service, handle, dir) = start_service("invalid");
        let result = service
            .place_order("DCE.c2605", Side::Buy, Offset::Open, 0.0, None)
            .unwrap();
        assert_eq!(result.status, OrderResultStatus::Error);
        service.stop();
        handle.join().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn close_position_on_a_flat_symbol_sends_no_orders() {
        let (service, handle, dir) = start_service("flat");
        let results = service.close_position("DCE.c2605").unwrap();
        assert!(results.is_empty());
        service.stop();
        handle.join().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }
}
