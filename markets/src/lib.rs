// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! # Markets
//!
//! Symbol codec and the market-data domain types (quotes, K-line bars,
//! account/position snapshots, direction/side enums) shared by every other
//! crate in the workspace. No crate in this workspace should own a second
//! definition of "what a quote looks like" — they depend on this one.

pub mod direction;
pub mod kline;
pub mod quote;
pub mod session;
pub mod signal;
pub mod symbol;

pub use direction::{Direction, Offset, Side};
pub use kline::{Bar, Duration, Series, SeriesKey};
pub use quote::{AccountInfo, BrokerPosition, Quote};
pub use session::{
    is_forced_close_window, is_trading_minute, is_trading_time, local_date, minute_of_day,
    minutes_until_next_open,
};
pub use signal::{Action, AiSignal, Bias};
pub use symbol::{from_broker, to_broker, Exchange, SymbolError};
