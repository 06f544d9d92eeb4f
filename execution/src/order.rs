// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `OrderResult`: returned by [`crate::service::MarketDataService::place_order`]
//! once the worker reports a terminal submission status, or a timeout
//! sentinel if it never does within the deadline (spec §4.3).

use autotrader_markets::{Offset, Side};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderResultStatus {
    Submitted,
    Error,
    Timeout,
}

#[derive(Debug, Clone)]
pub struct OrderResult {
    pub id: u64,
    pub status: OrderResultStatus,
    pub symbol: String,
    pub side: Side,
    pub offset: Offset,
    pub volume: f64,
    pub price: Option<f64>,
    pub time: DateTime<Utc>,
    pub error: Option<String>,
}
