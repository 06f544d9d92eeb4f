// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments, type_alias_bounds)]

//! Managed-position lifecycle: ATR-anchored stop-loss/take-profit, the
//! monotonic trailing-stop ratchet, exit detection, P&L attribution, and
//! reconciliation against broker-reported volume.

pub mod error;
pub mod manager;
pub mod position;

pub use error::TraderError;
pub use manager::PositionManager;
pub use position::{ClosePnl, EntryParams, ExitReason, ManagedPosition};
