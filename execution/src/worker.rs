// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! The single-owner broker worker (spec §4.3). Runs on its own dedicated OS
//! thread, which in turn hosts a current-thread Tokio runtime so it can
//! drive the async [`BrokerGateway`] session — no other thread ever touches
//! the gateway directly.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use autotrader_analytics::atr_latest;
use autotrader_broker::{BrokerGateway, CallbackEvent, Credentials, OrderStatus, SendOrder};
use autotrader_integration::{DataStore, TradeLogEntry, TradeLogType};
use autotrader_markets::kline::Bar;
use autotrader_markets::{AccountInfo, BrokerPosition, Direction, Offset, Quote, Side};
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};

use crate::cache::MarketDataCaches;
use crate::order::{OrderResult, OrderResultStatus};
use crate::request::{SubscriptionKey, WorkerCommand};

/// The only ATR period the worker keeps pre-computed (spec §4.2: "period 14
/// in production"). Callers after a different period fall back to an
/// on-demand subscription and compute it themselves from the cached series.
const PRODUCTION_ATR_PERIOD: usize = 14;

struct PendingOrder {
    ticket: u64,
    reply: oneshot::Sender<OrderResult>,
    symbol: String,
    side: Side,
    offset: Offset,
    volume: f64,
    price: Option<f64>,
    time: chrono::DateTime<Utc>,
}

/// Spawns the worker thread. The returned handle is joined by
/// [`crate::service::MarketDataService::stop`].
pub fn spawn(
    gateway: Box<dyn BrokerGateway>,
    creds: Credentials,
    caches: Arc<MarketDataCaches>,
    commands: mpsc::UnboundedReceiver<WorkerCommand>,
    trade_log: Arc<DataStore>,
) -> std::thread::JoinHandle<()> {
    std::thread::Builder::new()
        .name("broker-worker".to_string())
        .spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to start broker worker runtime");
            runtime.block_on(run(gateway, creds, caches, commands, trade_log));
        })
        .expect("failed to spawn broker worker thread")
}

async fn run(
    gateway: Box<dyn BrokerGateway>,
    creds: Credentials,
    caches: Arc<MarketDataCaches>,
    mut commands: mpsc::UnboundedReceiver<WorkerCommand>,
    trade_log: Arc<DataStore>,
) {
    let mut events = match gateway.initialize_login(&creds).await {
        Ok(rx) => rx,
        Err(err) => {
            tracing::error!(?err, "broker login failed, worker exiting without retry");
            caches.set_ready(false);
            return;
        }
    };
    caches.set_ready(true);
    tracing::info!("broker worker ready");

    let mut subscribed_quotes: HashSet<String> = HashSet::new();
    let mut pending_orders: HashMap<String, PendingOrder> = HashMap::new();
    let mut next_ticket: u64 = 1;

    loop {
        tokio::select! {
            cmd = commands.recv() => {
                match cmd {
                    Some(WorkerCommand::Shutdown) | None => break,
                    Some(cmd) => handle_command(
                        cmd,
                        gateway.as_ref(),
                        &mut subscribed_quotes,
                        &mut pending_orders,
                        &mut next_ticket,
                        &trade_log,
                    ),
                }
            }
            event = events.recv() => {
                match event {
                    Some(event) => handle_event(event, &caches, &mut pending_orders, &trade_log),
                    None => {
                        tracing::warn!("broker event stream closed, worker exiting");
                        break;
                    }
                }
            }
            // Caps each step at ~500ms even with no commands or events pending,
            // matching the broker's own `wait_update` polling cadence.
            _ = tokio::time::sleep(StdDuration::from_millis(500)) => {}
        }
    }

    caches.set_ready(false);
    gateway.shutdown();
}

fn handle_command(
    cmd: WorkerCommand,
    gateway: &dyn BrokerGateway,
    subscribed_quotes: &mut HashSet<String>,
    pending_orders: &mut HashMap<String, PendingOrder>,
    next_ticket: &mut u64,
    trade_log: &DataStore,
) {
    match cmd {
        WorkerCommand::Subscribe(SubscriptionKey::Quote(symbol)) => {
            if subscribed_quotes.insert(symbol.clone()) {
                if let Err(err) = gateway.subscribe_quote(&symbol) {
                    tracing::warn!(?err, symbol, "quote subscription failed");
                }
                // Auto-subscribe the position channel alongside the quote,
                // per spec §4.3, so positions opened out-of-band surface.
                if let Err(err) = gateway.subscribe_position(&symbol) {
                    tracing::warn!(?err, symbol, "position subscription failed");
                }
            }
        }
        WorkerCommand::Subscribe(SubscriptionKey::Kline { symbol, duration, count }) => {
            if let Err(err) = gateway.subscribe_kline(&symbol, duration.0, count) {
                tracing::warn!(?err, symbol, duration = duration.0, "kline subscription failed");
            }
        }
        WorkerCommand::Subscribe(SubscriptionKey::Position(symbol)) => {
            if let Err(err) = gateway.subscribe_position(&symbol) {
                tracing::warn!(?err, symbol, "position subscription failed");
            }
        }
        WorkerCommand::PlaceOrder { symbol, side, offset, volume, limit_price, reply } => {
            let ticket = *next_ticket;
            *next_ticket += 1;
            let order = SendOrder {
                symbol: symbol.clone(),
                side,
                offset,
                volume,
                price: limit_price,
            };
            match gateway.send_order(&order) {
                Ok(order_id) => {
                    pending_orders.insert(
                        order_id,
                        PendingOrder {
                            ticket,
                            reply,
                            symbol,
                            side,
                            offset,
                            volume,
                            price: limit_price,
                            time: Utc::now(),
                        },
                    );
                }
                Err(err) => {
                    let time = Utc::now();
                    trade_log.append_trade_log(TradeLogEntry {
                        timestamp: time,
                        symbol: symbol.clone(),
                        r#type: match offset {
                            Offset::Open => TradeLogType::Open,
                            _ => TradeLogType::Close,
                        },
                        direction: match side {
                            Side::Buy => Direction::Long,
                            Side::Sell => Direction::Short,
                        },
                        lots: volume as u32,
                        price: limit_price.unwrap_or(0.0),
                        order_id: Some(ticket),
                    });
                    let _ = reply.send(OrderResult {
                        id: ticket,
                        status: OrderResultStatus::Error,
                        symbol,
                        side,
                        offset,
                        volume,
                        price: limit_price,
                        time,
                        error: Some(err.to_string()),
                    });
                }
            }
        }
        WorkerCommand::Shutdown => unreachable!("handled by the caller before dispatch"),
    }
}

fn handle_event(
    event: CallbackEvent,
    caches: &MarketDataCaches,
    pending_orders: &mut HashMap<String, PendingOrder>,
    trade_log: &DataStore,
) {
    match event {
        CallbackEvent::Tick { symbol, last_price, volume, open_interest, bid_price1, ask_price1, timestamp } => {
            let mut quote = caches.get_quote(&symbol).unwrap_or_else(Quote::zero_sentinel);
            quote.last_price = last_price;
            quote.volume = volume;
            quote.open_interest = open_interest;
            quote.bid_price1 = bid_price1;
            quote.ask_price1 = ask_price1;
            quote.updated_at = timestamp;
            caches.put_quote(&symbol, quote);
        }
        CallbackEvent::OrderUpdated { order_id, status } => {
            let Some(pending) = pending_orders.remove(&order_id) else {
                return;
            };
            let (result_status, error) = match status {
                OrderStatus::Submitted | OrderStatus::Filled => (OrderResultStatus::Submitted, None),
                OrderStatus::Rejected => (OrderResultStatus::Error, Some("order rejected".to_string())),
                OrderStatus::Canceled => (OrderResultStatus::Error, Some("order canceled".to_string())),
            };
            let result = OrderResult {
                id: pending.ticket,
                status: result_status,
                symbol: pending.symbol.clone(),
                side: pending.side,
                offset: pending.offset,
                volume: pending.volume,
                price: pending.price,
                time: pending.time,
                error: error.clone(),
            };
            if !matches!(result_status, OrderResultStatus::Timeout) {
                trade_log.append_trade_log(TradeLogEntry {
                    timestamp: result.time,
                    symbol: pending.symbol,
                    r#type: match pending.offset {
                        Offset::Open => TradeLogType::Open,
                        _ => TradeLogType::Close,
                    },
                    direction: match pending.side {
                        Side::Buy => Direction::Long,
                        Side::Sell => Direction::Short,
                    },
                    lots: pending.volume as u32,
                    price: pending.price.unwrap_or(0.0),
                    order_id: Some(pending.ticket),
                });
            }
            let _ = pending.reply.send(result);
        }
        CallbackEvent::PositionChanged { symbol, pos_long, pos_short, open_price_long, open_price_short } => {
            let previous = caches.get_position(&symbol).unwrap_or_default();
            caches.put_position(
                &symbol,
                BrokerPosition {
                    pos_long: pos_long as u32,
                    pos_short: pos_short as u32,
                    open_price_long,
                    open_price_short,
                    ..previous
                },
            );
        }
        CallbackEvent::AccountChanged {
            balance,
            available,
            float_profit,
            position_profit,
            close_profit,
            margin,
            commission,
            static_balance,
        } => {
            caches.put_account(AccountInfo {
                balance,
                available,
                float_profit,
                position_profit,
                close_profit,
                margin,
                commission,
                static_balance,
            });
        }
        CallbackEvent::KlineBar { symbol, duration_secs, bar } => {
            caches.push_bar(&symbol, duration_secs, bar);
            recompute_atr(caches, &symbol, duration_secs);
        }
    }
}

fn recompute_atr(caches: &MarketDataCaches, symbol: &str, duration_secs: u32) {
    let Some(bars) = caches.get_klines(symbol, duration_secs, PRODUCTION_ATR_PERIOD + 50) else {
        return;
    };
    let bars: Vec<Bar> = bars;
    let value = atr_latest(&bars, PRODUCTION_ATR_PERIOD);
    if value.is_finite() {
        caches.put_atr(symbol, duration_secs, PRODUCTION_ATR_PERIOD, value);
    }
}
