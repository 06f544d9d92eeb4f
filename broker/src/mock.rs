// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Mock broker connector. Simulates quote ticks, order acknowledgements and
//! position/account updates for testing and for environments without a live
//! exchange session.

use crate::error::BrokerError;
use autotrader_markets::kline::Bar;
use autotrader_markets::{Offset, Side};
use chrono::Utc;
use std::collections::HashMap;
use std::env;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Asynchronous event emitted by a broker connector.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum CallbackEvent {
    /// New quote tick for a subscribed symbol (broker symbol form).
    Tick {
        symbol: String,
        last_price: f64,
        volume: f64,
        open_interest: f64,
        bid_price1: f64,
        ask_price1: f64,
        timestamp: chrono::DateTime<Utc>,
    },
    /// Terminal status update for a previously submitted order.
    OrderUpdated { order_id: String, status: OrderStatus },
    /// Position snapshot for a symbol the gateway has subscribed to.
    PositionChanged {
        symbol: String,
        pos_long: f64,
        pos_short: f64,
        open_price_long: f64,
        open_price_short: f64,
    },
    /// Account-level balance/margin snapshot.
    AccountChanged {
        balance: f64,
        available: f64,
        float_profit: f64,
        position_profit: f64,
        close_profit: f64,
        margin: f64,
        commission: f64,
        static_balance: f64,
    },
    /// A single K-line bar for a subscribed `(symbol, duration_seconds)`
    /// key, either a backfilled historical bar or a freshly closed one.
    KlineBar {
        symbol: String,
        duration_secs: u32,
        bar: Bar,
    },
}

/// Terminal order status reported through [`CallbackEvent::OrderUpdated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Submitted,
    Filled,
    Rejected,
    Canceled,
}

/// An order submission to the gateway.
#[derive(Debug, Clone)]
pub struct SendOrder {
    pub symbol: String,
    pub side: Side,
    pub offset: Offset,
    pub volume: f64,
    pub price: Option<f64>,
}

struct GeneratorEntry {
    handle: JoinHandle<()>,
    stop: Arc<AtomicBool>,
}

fn synthetic_bar(datetime: chrono::DateTime<Utc>, prev_close: f64, seq: i64) -> Bar {
    let drift = ((seq % 7) - 3) as f64;
    let open = prev_close;
    let close = open + drift;
    Bar {
        datetime,
        open,
        high: open.max(close) + 1.0,
        low: open.min(close) - 1.0,
        close,
        volume: 100.0 + (seq % 5) as f64 * 10.0,
        open_interest: Some(10_000.0 + seq as f64),
    }
}

/// Synthetic broker connector that simulates the counterpart of a real
/// exchange session: subscribing to a symbol starts a background tick
/// generator on the shared tokio runtime; orders are acknowledged
/// immediately as filled.
pub struct MockConnector {
    sender: Mutex<Option<UnboundedSender<CallbackEvent>>>,
    generators: Mutex<HashMap<String, GeneratorEntry>>,
    kline_generators: Mutex<HashMap<(String, u32), GeneratorEntry>>,
    next_order_id: Mutex<u64>,
}

impl MockConnector {
    pub fn new() -> Result<Self, BrokerError> {
        Ok(Self {
            sender: Mutex::new(None),
            generators: Mutex::new(HashMap::new()),
            kline_generators: Mutex::new(HashMap::new()),
            next_order_id: Mutex::new(1),
        })
    }

    pub async fn initialize_login(&self) -> Result<UnboundedReceiver<CallbackEvent>, BrokerError> {
        let (tx, rx) = unbounded_channel();
        *self.sender.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    pub fn subscribe_quote(&self, symbol: &str) -> Result<(), BrokerError> {
        let mut generators = self.generators.lock().unwrap();
        if generators.contains_key(symbol) {
            return Ok(());
        }
        let Some(tx) = self.sender.lock().unwrap().clone() else {
            return Err(BrokerError::NotInitialized);
        };
        let symbol_owned = symbol.to_string();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop_flag);
        let interval_ms: u64 = env::var("BROKER_MOCK_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0 && *v <= 60_000)
            .unwrap_or(500);
        let handle = tokio::spawn(async move {
            let mut seq: i64 = 0;
            let mut price = 3_000.0;
            while !stop_clone.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                if stop_clone.load(Ordering::Relaxed) {
                    break;
                }
                price += ((seq % 7) - 3) as f64;
                let _ = tx.send(CallbackEvent::Tick {
                    symbol: symbol_owned.clone(),
                    last_price: price,
                    volume: 100.0 + (seq % 5) as f64 * 10.0,
                    open_interest: 10_000.0 + seq as f64,
                    bid_price1: price - 1.0,
                    ask_price1: price + 1.0,
                    timestamp: Utc::now(),
                });
                seq += 1;
            }
        });
        generators.insert(
            symbol.to_string(),
            GeneratorEntry {
                handle,
                stop: stop_flag,
            },
        );
        Ok(())
    }

    pub fn unsubscribe_quote(&self, symbol: &str) -> Result<(), BrokerError> {
        if let Some(entry) = self.generators.lock().unwrap().remove(symbol) {
            entry.stop.store(true, Ordering::Relaxed);
            entry.handle.abort();
        }
        Ok(())
    }

    /// Subscribes to a `(symbol, duration_secs)` K-line key: immediately
    /// backfills `count` synthetic bars, then emits one freshly closed bar
    /// every `duration_secs` (scaled down for test responsiveness via
    /// `BROKER_MOCK_KLINE_SPEEDUP`).
    pub fn subscribe_kline(
        &self,
        symbol: &str,
        duration_secs: u32,
        count: usize,
    ) -> Result<(), BrokerError> {
        let key = (symbol.to_string(), duration_secs);
        let mut generators = self.kline_generators.lock().unwrap();
        if generators.contains_key(&key) {
            return Ok(());
        }
        let Some(tx) = self.sender.lock().unwrap().clone() else {
            return Err(BrokerError::NotInitialized);
        };
        let symbol_owned = symbol.to_string();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop_flag);
        let speedup: u32 = env::var("BROKER_MOCK_KLINE_SPEEDUP")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(60);
        let tick_ms = (duration_secs.max(1) as u64 * 1000 / speedup as u64).max(50);
        let handle = tokio::spawn(async move {
            let now = Utc::now();
            let mut price = 3_000.0;
            for i in 0..count {
                let offset = (count - i) as i64 * duration_secs as i64;
                let bar = synthetic_bar(now - chrono::Duration::seconds(offset), price, i as i64);
                price = bar.close;
                let _ = tx.send(CallbackEvent::KlineBar {
                    symbol: symbol_owned.clone(),
                    duration_secs,
                    bar,
                });
            }
            let mut seq = count as i64;
            while !stop_clone.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(tick_ms)).await;
                if stop_clone.load(Ordering::Relaxed) {
                    break;
                }
                let bar = synthetic_bar(Utc::now(), price, seq);
                price = bar.close;
                let _ = tx.send(CallbackEvent::KlineBar {
                    symbol: symbol_owned.clone(),
                    duration_secs,
                    bar,
                });
                seq += 1;
            }
        });
        generators.insert(
            key,
            GeneratorEntry {
                handle,
                stop: stop_flag,
            },
        );
        Ok(())
    }

    pub fn subscribe_position(&self, symbol: &str) -> Result<(), BrokerError> {
        if let Some(tx) = self.sender.lock().unwrap().as_ref() {
            let _ = tx.send(CallbackEvent::PositionChanged {
                symbol: symbol.to_string(),
                pos_long: 0.0,
                pos_short: 0.0,
                open_price_long: 0.0,
                open_price_short: 0.0,
            });
        }
        Ok(())
    }

    pub fn send_order(&self, order: &SendOrder) -> Result<String, BrokerError> {
        if order.volume <= 0.0 {
            return Err(BrokerError::InvalidArgs);
        }
        let mut counter = self.next_order_id.lock().unwrap();
        let order_id = format!("mock-{}", *counter);
        *counter += 1;
        if let Some(tx) = self.sender.lock().unwrap().as_ref() {
            let _ = tx.send(CallbackEvent::OrderUpdated {
                order_id: order_id.clone(),
                status: OrderStatus::Filled,
            });
        }
        Ok(order_id)
    }

    pub fn cancel_order(&self, _order_id: &str) -> Result<(), BrokerError> {
        Ok(())
    }

    pub fn shutdown(&self) {
        self.stop_all_generators();
    }

    fn stop_all_generators(&self) {
        let mut generators = self.generators.lock().unwrap();
        for (_symbol, entry) in generators.drain() {
            entry.stop.store(true, Ordering::Relaxed);
            entry.handle.abort();
        }
        let mut kline_generators = self.kline_generators.lock().unwrap();
        for (_key, entry) in kline_generators.drain() {
            entry.stop.store(true, Ordering::Relaxed);
            entry.handle.abort();
        }
    }
}

impl Drop for MockConnector {
    fn drop(&mut self) {
        self.stop_all_generators();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_order_rejects_non_positive_volume() {
        let connector = MockConnector::new().unwrap();
        let order = SendOrder {
            symbol: "DCE.c2605".into(),
            side: Side::Buy,
            offset: Offset::Open,
            volume: 0.0,
            price: None,
        };
        assert_eq!(connector.send_order(&order), Err(BrokerError::InvalidArgs));
    }

    #[test]
    fn send_order_assigns_increasing_ids() {
        let connector = MockConnector::new().unwrap();
        let order = SendOrder {
            symbol: "DCE.c2605".into(),
            side: Side::Buy,
            offset: Offset::Open,
            volume: 1.0,
            price: None,
        };
        let first = connector.send_order(&order).unwrap();
        let second = connector.send_order(&order).unwrap();
        assert_ne!(first, second);
    }
}
