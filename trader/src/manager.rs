// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `PositionManager`: the engine-wide orchestrator over all managed
//! positions (spec §3, §4.7), enforcing "exactly one managed position per
//! symbol" and reconciling against broker-reported volume.

use std::collections::HashMap;

use autotrader_integration::DataStore;
use autotrader_markets::{BrokerPosition, Direction};
use chrono::{DateTime, Utc};

use crate::error::TraderError;
use crate::position::{EntryParams, ExitReason, ManagedPosition};

#[derive(Debug, Default)]
pub struct PositionManager {
    positions: HashMap<String, ManagedPosition>,
}

impl PositionManager {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }

    /// Restores managed positions from the persistence layer at startup.
    pub fn load(store: &DataStore) -> Self {
        let positions = store
            .load_positions()
            .into_iter()
            .map(|(symbol, record)| (symbol, ManagedPosition::from_record(record)))
            .collect();
        Self { positions }
    }

    /// Full-rewrite persistence (spec §4.6: "full rewrite on every change").
    pub fn save(&self, store: &DataStore) {
        let records = self
            .positions
            .iter()
            .map(|(symbol, position)| (symbol.clone(), position.to_record()))
            .collect();
        store.save_positions(&records);
    }

    pub fn has_position(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&ManagedPosition> {
        self.positions.get(symbol)
    }

    pub fn all(&self) -> impl Iterator<Item = &ManagedPosition> {
        self.positions.values()
    }

    /// Opens a new managed position, refusing a duplicate on the same
    /// symbol (spec §3: "exactly one managed position per symbol").
    pub fn open(
        &mut self,
        symbol: &str,
        direction: Direction,
        entry_price: f64,
        atr_at_entry: f64,
        lots: u32,
        sl_mult: f64,
        tp_mult: f64,
        opened_at: DateTime<Utc>,
    ) -> Result<(), TraderError> {
        if self.positions.contains_key(symbol) {
            return Err(TraderError::AlreadyOpen(symbol.to_string()));
        }
        let position = ManagedPosition::open(
            symbol,
            EntryParams {
                direction,
                entry_price,
                atr_at_entry,
                lots,
                sl_mult,
                tp_mult,
                opened_at,
            },
        );
        self.positions.insert(symbol.to_string(), position);
        Ok(())
    }

    pub fn remove(&mut self, symbol: &str) -> Result<ManagedPosition, TraderError> {
        self.positions
            .remove(symbol)
            .ok_or_else(|| TraderError::NotFound(symbol.to_string()))
    }

    /// Applies the trailing-stop ratchet to a live position on a new tick or
    /// bar close. No-op if the symbol has no managed position.
    pub fn apply_trailing(&mut self, symbol: &str, price: f64, trail_step: f64, trail_move: f64) {
        if let Some(position) = self.positions.get_mut(symbol) {
            position.apply_trailing_ratchet(price, trail_step, trail_move);
        }
    }

    /// Checks exit conditions for a live position. Does not remove it — the
    /// caller closes the order first, then calls [`Self::remove`] once the
    /// broker confirms the fill.
    pub fn check_exit(
        &self,
        symbol: &str,
        low: f64,
        high: f64,
        now: DateTime<Utc>,
        close_before_market_close: bool,
    ) -> Option<ExitReason> {
        self.positions
            .get(symbol)
            .and_then(|position| position.check_exit(low, high, now, close_before_market_close))
    }

    /// Reconciles managed positions against broker-reported volume (spec
    /// §3, scenario S4): drops a managed position the broker reports flat,
    /// and restores one from broker volume when the engine tracks none but
    /// the broker reports a non-flat position, using `now` as the entry time
    /// and `default_atr` as a conservative ATR-at-entry (the true entry ATR
    /// is unrecoverable once restarted without it).
    pub fn reconcile(
        &mut self,
        symbol: &str,
        broker: &BrokerPosition,
        default_atr: f64,
        sl_mult: f64,
        tp_mult: f64,
        now: DateTime<Utc>,
    ) {
        if broker.is_flat() {
            if self.positions.remove(symbol).is_some() {
                tracing::info!(symbol, "dropping managed position: broker reports flat");
            }
            return;
        }
        if self.positions.contains_key(symbol) {
            return;
        }
        // A hedged book (both legs non-zero) is ambiguous to restore as a
        // single managed position (spec §9 open question); LONG wins ties,
        // matching the spec's own "engine manages the side it opened" framing.
        let (direction, entry_price, lots) = if broker.pos_long > 0 {
            (Direction::Long, broker.open_price_long, broker.pos_long)
        } else {
            (Direction::Short, broker.open_price_short, broker.pos_short)
        };
        tracing::warn!(symbol, lots, "reconciling untracked broker position into a managed one");
        let position = ManagedPosition::open(
            symbol,
            EntryParams {
                direction,
                entry_price,
                atr_at_entry: default_atr,
                lots,
                sl_mult,
                tp_mult,
                opened_at: now,
            },
        );
        self.positions.insert(symbol.to_string(), position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 29, 2, 0, 0).unwrap()
    }

    #[test]
    fn opening_twice_on_the_same_symbol_is_rejected() {
        let mut mgr = PositionManager::new();
        mgr.open("C2605", Direction::Long, 2450.0, 10.0, 1, 1.2, 2.0, now())
            .unwrap();
        let err = mgr
            .open("C2605", Direction::Long, 2451.0, 10.0, 1, 1.2, 2.0, now())
            .unwrap_err();
        assert_eq!(err, TraderError::AlreadyOpen("C2605".to_string()));
    }

    #[test]
    fn removing_an_unknown_symbol_errors() {
        let mut mgr = PositionManager::new();
        assert_eq!(mgr.remove("C2605").unwrap_err(), TraderError::NotFound("C2605".to_string()));
    }

    #[test]
    fn s4_reconcile_restores_untracked_broker_position() {
        let mut mgr = PositionManager::new();
        assert!(!mgr.has_position("C2605"));
        let broker = BrokerPosition {
            pos_long: 1,
            pos_short: 0,
            open_price_long: 2450.0,
            open_price_short: 0.0,
            ..Default::default()
        };
        mgr.reconcile("C2605", &broker, 10.0, 1.2, 2.0, now());
        assert!(mgr.has_position("C2605"));
        let pos = mgr.get("C2605").unwrap();
        assert_eq!(pos.direction, Direction::Long);
        assert_eq!(pos.entry_price, 2450.0);
    }

    #[test]
    fn s4_reconcile_drops_managed_position_when_broker_reports_flat() {
        let mut mgr = PositionManager::new();
        mgr.open("C2605", Direction::Long, 2450.0, 10.0, 1, 1.2, 2.0, now())
            .unwrap();
        mgr.reconcile("C2605", &BrokerPosition::default(), 10.0, 1.2, 2.0, now());
        assert!(!mgr.has_position("C2605"));
    }

    #[test]
    fn reconcile_does_not_disturb_an_already_tracked_position() {
        let mut mgr = PositionManager::new();
        mgr.open("C2605", Direction::Long, 2450.0, 10.0, 1, 1.2, 2.0, now())
            .unwrap();
        let broker = BrokerPosition {
            pos_long: 3,
            pos_short: 0,
            open_price_long: 2500.0,
            open_price_short: 0.0,
            ..Default::default()
        };
        mgr.reconcile("C2605", &broker, 10.0, 1.2, 2.0, now());
        assert_eq!(mgr.get("C2605").unwrap().entry_price, 2450.0);
    }
}
