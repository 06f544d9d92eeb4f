// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `TradeLogEntry`: the subset of decisions with `action != Hold` (spec §3),
//! also append-only on disk. Fed both by the market-data service (raw order
//! acknowledgements, spec §4.3) and by the position manager (open/close
//! decisions, spec §4.7).

use crate::sanitize::{sanitize_f64, Sanitize};
use autotrader_markets::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeLogType {
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLogEntry {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub r#type: TradeLogType,
    pub direction: Direction,
    pub lots: u32,
    pub price: f64,
    pub order_id: Option<u64>,
}

impl Sanitize for TradeLogEntry {
    fn sanitized(&self) -> Self {
        Self {
            price: sanitize_f64(self.price),
            ..self.clone()
        }
    }
}
