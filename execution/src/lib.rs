// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations, rust_2018_idioms)]

//! # Execution
//!
//! The market-data service (C3, spec §4.3) — the most delicate component in
//! the engine. A single dedicated OS thread owns the [`BrokerGateway`]
//! session exclusively; every other thread talks to it only through
//! [`MarketDataService`]'s getters and `place_order`/`close_position`, which
//! enqueue intents on a lock-protected queue and poll thread-safe cache
//! snapshots. No caller outside this crate ever touches a broker object
//! directly.

pub mod cache;
pub mod error;
pub mod order;
pub mod request;
pub mod service;
mod worker;

pub use cache::MarketDataCaches;
pub use error::ExecutionError;
pub use order::{OrderResult, OrderResultStatus};
pub use request::SubscriptionKey;
pub use service::MarketDataService;
