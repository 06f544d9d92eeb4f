// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `TradeDecision`: an immutable record emitted per scheduler tick or exit
//! event (spec §3). Decisions form an append-only log, capped at 500 in
//! memory and truncated to 300 on save (spec §3/§4.4).

use crate::sanitize::{sanitize_f64, Sanitize};
use autotrader_markets::{Action, AiSignal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum decisions retained in memory before the oldest are dropped.
pub const DECISION_MEMORY_CAP: usize = 500;

/// Decisions beyond this count are dropped from the on-disk copy on save
/// (the in-memory ring itself stays at [`DECISION_MEMORY_CAP`]).
pub const DECISION_DISK_CAP: usize = 300;

/// Outcome of an order submission, embedded in a decision when the action
/// was an entry or exit rather than a `Hold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderOutcomeRecord {
    pub id: u64,
    pub status: OrderStatusLabel,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatusLabel {
    Submitted,
    Error,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDecision {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub action: Action,
    pub lots: u32,
    pub price: f64,
    pub reason: String,
    /// Local 7-factor signal that drove the decision, if any (swing mode's
    /// AI-only path leaves this `None`).
    pub signal: Option<AiSignal>,
    pub composite_score: f64,
    pub atr: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub entry_price: f64,
    pub pnl_points: f64,
    pub pnl_pct: f64,
    pub holding_seconds: i64,
    pub order_result: Option<OrderOutcomeRecord>,
}

impl Sanitize for TradeDecision {
    fn sanitized(&self) -> Self {
        Self {
            price: sanitize_f64(self.price),
            composite_score: sanitize_f64(self.composite_score),
            atr: sanitize_f64(self.atr),
            stop_loss: sanitize_f64(self.stop_loss),
            take_profit: sanitize_f64(self.take_profit),
            entry_price: sanitize_f64(self.entry_price),
            pnl_points: sanitize_f64(self.pnl_points),
            pnl_pct: sanitize_f64(self.pnl_pct),
            ..self.clone()
        }
    }
}

/// Append `decision` to the in-memory ring, dropping the oldest entry once
/// [`DECISION_MEMORY_CAP`] is exceeded.
pub fn push_capped(ring: &mut Vec<TradeDecision>, decision: TradeDecision) {
    ring.push(decision);
    if ring.len() > DECISION_MEMORY_CAP {
        let overflow = ring.len() - DECISION_MEMORY_CAP;
        ring.drain(0..overflow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(price: f64) -> TradeDecision {
        TradeDecision {
            timestamp: Utc::now(),
            symbol: "C2605".into(),
            action: Action::Hold,
            lots: 0,
            price,
            reason: "test".into(),
            signal: None,
            composite_score: f64::NAN,
            atr: 1.0,
            stop_loss: 0.0,
            take_profit: 0.0,
            entry_price: 0.0,
            pnl_points: 0.0,
            pnl_pct: 0.0,
            holding_seconds: 0,
            order_result: None,
        }
    }

    #[test]
    fn ring_drops_oldest_past_cap() {
        let mut ring = Vec::new();
        for i in 0..(DECISION_MEMORY_CAP + 10) {
            push_capped(&mut ring, decision(i as f64));
        }
        assert_eq!(ring.len(), DECISION_MEMORY_CAP);
        assert_eq!(ring.first().unwrap().price, 10.0);
    }

    #[test]
    fn sanitize_replaces_nan_composite_score() {
        let d = decision(1.0).sanitized();
        assert_eq!(d.composite_score, 0.0);
    }
}
