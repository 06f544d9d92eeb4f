//! Façade crate for the futures auto-trading engine.
//!
//! Re-exports every workspace crate under one namespace for host
//! applications that prefer a single dependency. The control surface a host
//! actually drives (spec §6) is [`core::Scheduler`]: `start`/`stop`/
//! `auto_resume`/`add_contract`/`remove_contract`/`get_status`/
//! `get_decisions`/`clear_decisions`/`get_trade_log`.
//!
//! # Example
//! ```rust,no_run
//! use autotrader::core::Scheduler;
//! use autotrader::broker::{new_backend, Credentials, TradeMode};
//! use autotrader::strategies::MockBiasOracle;
//! use autotrader::integration::TradeConfig;
//! use std::sync::Arc;
//!
//! let gateway = new_backend().expect("broker backend");
//! let creds = Credentials {
//!     user: "sim".into(),
//!     password: "sim".into(),
//!     trade_mode: TradeMode::Sim,
//!     broker_id: String::new(),
//!     broker_account: String::new(),
//!     broker_password: String::new(),
//! };
//! let scheduler = Scheduler::start(
//!     vec!["C2605".into()],
//!     TradeConfig::default(),
//!     gateway,
//!     creds,
//!     "./data",
//!     Arc::new(MockBiasOracle::default()),
//! );
//! ```

pub use autotrader_analytics as analytics;
pub use autotrader_broker as broker;
pub use autotrader_core as core;
pub use autotrader_execution as execution;
pub use autotrader_integration as integration;
pub use autotrader_markets as markets;
pub use autotrader_risk as risk;
pub use autotrader_strategies as strategies;
pub use autotrader_trader as trader;

// Flat re-export of the symbols a host application touches most often.
pub use autotrader_core::{EngineError, EngineStatus, Scheduler};
pub use autotrader_integration::{StrategyMode, TradeConfig, TradeDecision};
pub use autotrader_markets::{Direction, Side};

/// Single import for the common host-facing surface.
pub mod prelude {
    pub use crate::broker::{new_backend, BrokerGateway, Credentials, TradeMode};
    pub use crate::core::{EngineStatus, Scheduler};
    pub use crate::integration::{StrategyMode, TradeConfig, TradeDecision};
    pub use crate::markets::{Direction, Side};
    pub use crate::strategies::{BiasOracle, MockBiasOracle};
}
