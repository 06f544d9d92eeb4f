// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! The four fixed files in a data directory (spec §4.4): full rewrite on
//! every change, best-effort read (a missing or corrupt file logs a warning
//! and the caller gets an empty collection rather than a startup failure).

use crate::config::TradeConfig;
use crate::decision::{TradeDecision, DECISION_DISK_CAP};
use crate::error::PersistenceError;
use crate::position::ManagedPositionRecord;
use crate::sanitize::Sanitize;
use crate::trade_log::TradeLogEntry;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Owns the fixed set of persistence file paths under a data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn decisions_path(&self) -> PathBuf {
        self.path("auto_decisions.json")
    }
    fn positions_path(&self) -> PathBuf {
        self.path("auto_positions.json")
    }
    fn trade_log_path(&self) -> PathBuf {
        self.path("auto_trade_log.json")
    }
    fn config_path(&self) -> PathBuf {
        self.path("auto_config.json")
    }

    // --- decisions ---

    pub fn load_decisions(&self) -> Vec<TradeDecision> {
        read_best_effort(&self.decisions_path())
    }

    /// Full rewrite, truncated to the most recent [`DECISION_DISK_CAP`]
    /// entries regardless of how many the caller's in-memory ring holds.
    pub fn save_decisions(&self, decisions: &[TradeDecision]) {
        let start = decisions.len().saturating_sub(DECISION_DISK_CAP);
        let sanitized: Vec<_> = decisions[start..].iter().map(Sanitize::sanitized).collect();
        write_best_effort(&self.decisions_path(), &sanitized);
    }

    // --- managed positions ---

    pub fn load_positions(&self) -> HashMap<String, ManagedPositionRecord> {
        read_best_effort::<Vec<ManagedPositionRecord>>(&self.positions_path())
            .into_iter()
            .map(|p| (p.symbol.clone(), p))
            .collect()
    }

    pub fn save_positions(&self, positions: &HashMap<String, ManagedPositionRecord>) {
        let mut sanitized: Vec<_> = positions.values().map(Sanitize::sanitized).collect();
        sanitized.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        write_best_effort(&self.positions_path(), &sanitized);
    }

    // --- trade log ---

    pub fn load_trade_log(&self) -> Vec<TradeLogEntry> {
        read_best_effort(&self.trade_log_path())
    }

    /// Appends one entry and rewrites the whole file (spec §4.4 write
    /// policy: full rewrite on every change, never incremental).
    pub fn append_trade_log(&self, entry: TradeLogEntry) {
        let mut entries = self.load_trade_log();
        entries.push(entry.sanitized());
        write_best_effort(&self.trade_log_path(), &entries);
    }

    // --- config ---

    pub fn load_config(&self) -> Option<TradeConfig> {
        read_one_best_effort(&self.config_path())
    }

    pub fn save_config(&self, config: &TradeConfig) {
        write_best_effort(&self.config_path(), config);
    }
}

fn read_best_effort<T>(path: &Path) -> Vec<T>
where
    T: DeserializeOwned,
{
    match read_json::<Vec<T>>(path) {
        Ok(items) => items,
        Err(PersistenceError::Read { .. }) => Vec::new(),
        Err(err) => {
            tracing::warn!(?err, path = %path.display(), "persistence read failed, starting empty");
            Vec::new()
        }
    }
}

fn read_one_best_effort<T>(path: &Path) -> Option<T>
where
    T: DeserializeOwned,
{
    match read_json::<T>(path) {
        Ok(value) => Some(value),
        Err(PersistenceError::Read { .. }) => None,
        Err(err) => {
            tracing::warn!(?err, path = %path.display(), "persistence read failed");
            None
        }
    }
}

fn read_json<T>(path: &Path) -> Result<T, PersistenceError>
where
    T: DeserializeOwned,
{
    let bytes = std::fs::read(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_best_effort<T>(path: &Path, value: &T)
where
    T: Serialize,
{
    if let Err(err) = write_json(path, value) {
        tracing::warn!(?err, path = %path.display(), "persistence write failed, in-memory state continues");
    }
}

fn write_json<T>(path: &Path, value: &T) -> Result<(), PersistenceError>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let body = serde_json::to_vec_pretty(value).map_err(|source| PersistenceError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, body).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyMode;
    use autotrader_markets::Direction;
    use chrono::Utc;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("autotrader-test-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_files_load_as_empty_without_error() {
        let store = DataStore::new(scratch_dir("missing"));
        assert!(store.load_decisions().is_empty());
        assert!(store.load_positions().is_empty());
        assert!(store.load_trade_log().is_empty());
        assert!(store.load_config().is_none());
    }

    #[test]
    fn positions_round_trip_by_symbol() {
        let dir = scratch_dir("positions");
        let store = DataStore::new(&dir);
        let mut positions = HashMap::new();
        positions.insert(
            "C2605".to_string(),
            ManagedPositionRecord {
                symbol: "C2605".into(),
                direction: Direction::Long,
                entry_price: 2450.0,
                atr_at_entry: 10.0,
                stop_loss: 2438.0,
                take_profit: 2470.0,
                highest_since_entry: 2450.0,
                lowest_since_entry: 2450.0,
                lots: 1,
                opened_at: Utc::now(),
                breakeven_triggered: false,
                sl_tightened: false,
                ratchet_steps: 0,
            },
        );
        store.save_positions(&positions);
        let reloaded = store.load_positions();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded["C2605"].stop_loss, 2438.0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn config_round_trips() {
        let dir = scratch_dir("config");
        let store = DataStore::new(&dir);
        let mut cfg = TradeConfig::default();
        cfg.contracts.push("C2605".into());
        cfg.strategy_mode = StrategyMode::Swing;
        store.save_config(&cfg);
        let reloaded = store.load_config().unwrap();
        assert_eq!(reloaded.contracts, vec!["C2605".to_string()]);
        assert!(matches!(reloaded.strategy_mode, StrategyMode::Swing));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn trade_log_append_rewrites_whole_file() {
        let dir = scratch_dir("trade_log");
        let store = DataStore::new(&dir);
        store.append_trade_log(TradeLogEntry {
            timestamp: Utc::now(),
            symbol: "C2605".into(),
            r#type: crate::trade_log::TradeLogType::Open,
            direction: Direction::Long,
            lots: 1,
            price: 2450.0,
            order_id: Some(1),
        });
        store.append_trade_log(TradeLogEntry {
            timestamp: Utc::now(),
            symbol: "C2605".into(),
            r#type: crate::trade_log::TradeLogType::Close,
            direction: Direction::Long,
            lots: 1,
            price: 2470.0,
            order_id: Some(2),
        });
        assert_eq!(store.load_trade_log().len(), 2);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
