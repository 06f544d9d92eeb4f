// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Subscription intents and order requests submitted to the worker (spec
//! §4.3). These cross the lock-protected command queue; the worker never
//! receives anything else.

use autotrader_markets::kline::Duration as BarDuration;
use autotrader_markets::{Offset, Side};
use tokio::sync::oneshot;

use crate::order::OrderResult;

/// A subscription intent keyed the way the spec's caches are keyed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubscriptionKey {
    Quote(String),
    Kline { symbol: String, duration: BarDuration, count: usize },
    Position(String),
}

/// A message drained by the worker each iteration of its event step.
pub enum WorkerCommand {
    Subscribe(SubscriptionKey),
    PlaceOrder {
        symbol: String,
        side: Side,
        offset: Offset,
        volume: f64,
        limit_price: Option<f64>,
        reply: oneshot::Sender<OrderResult>,
    },
    Shutdown,
}

impl std::fmt::Debug for WorkerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerCommand::Subscribe(key) => f.debug_tuple("Subscribe").field(key).finish(),
            WorkerCommand::PlaceOrder { symbol, side, offset, volume, limit_price, .. } => f
                .debug_struct("PlaceOrder")
                .field("symbol", symbol)
                .field("side", side)
                .field("offset", offset)
                .field("volume", volume)
                .field("limit_price", limit_price)
                .finish(),
            WorkerCommand::Shutdown => write!(f, "Shutdown"),
        }
    }
}
