// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations, rust_2018_idioms)]

//! # Integration
//!
//! The persistence layer (spec §4.4): four fixed JSON files in a data
//! directory — decisions, managed positions, trade log, runtime config.
//! Write policy is full-rewrite-on-every-change, never incremental; read
//! policy is best-effort (a missing or corrupt file logs a warning and the
//! corresponding in-memory collection starts empty rather than blocking
//! startup).
//!
//! Floats are sanitized only at the serialization boundary ([`sanitize`]) —
//! in-memory values keep full precision, including `NaN`/`Inf`, since
//! `serde_json` itself has no token for them.

pub mod config;
pub mod decision;
pub mod error;
pub mod position;
pub mod sanitize;
pub mod store;
pub mod trade_log;

pub use config::{StrategyMode, TradeConfig};
pub use decision::{
    OrderOutcomeRecord, OrderStatusLabel, TradeDecision, DECISION_DISK_CAP, DECISION_MEMORY_CAP,
};
pub use error::PersistenceError;
pub use position::ManagedPositionRecord;
pub use sanitize::{sanitize_f64, Sanitize};
pub use store::DataStore;
pub use trade_log::{TradeLogEntry, TradeLogType};
