// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `ManagedPositionRecord`: the plain-data shape persisted to
//! `auto_positions.json`. `autotrader-trader` owns the behavior-bearing
//! `ManagedPosition` and converts to/from this record so the persistence
//! layer never needs to depend back on the trader crate's logic.

use crate::sanitize::{sanitize_f64, Sanitize};
use autotrader_markets::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedPositionRecord {
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub atr_at_entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub highest_since_entry: f64,
    pub lowest_since_entry: f64,
    pub lots: u32,
    pub opened_at: DateTime<Utc>,
    pub breakeven_triggered: bool,
    pub sl_tightened: bool,
    /// Cumulative whole ratchet steps already applied since entry, counted
    /// against the fixed entry price (not the last call's price) so restart
    /// resumes the ratchet from the same cumulative baseline.
    pub ratchet_steps: u32,
}

impl Sanitize for ManagedPositionRecord {
    fn sanitized(&self) -> Self {
        Self {
            entry_price: sanitize_f64(self.entry_price),
            atr_at_entry: sanitize_f64(self.atr_at_entry),
            stop_loss: sanitize_f64(self.stop_loss),
            take_profit: sanitize_f64(self.take_profit),
            highest_since_entry: sanitize_f64(self.highest_since_entry),
            lowest_since_entry: sanitize_f64(self.lowest_since_entry),
            ..self.clone()
        }
    }
}
