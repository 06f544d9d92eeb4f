// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations, rust_2018_idioms)]

//! # Analytics
//!
//! Pure technical-indicator functions and closed-trade performance metrics
//! for the futures auto-trading core.
//!
//! ## Structure
//!
//! ```text
//! analytics/
//!  ├─ indicator/   # ATR, RSI, MACD, KDJ, ADX, moving averages, HTF trend
//!  └─ metric/      # WinRate, ProfitFactor, TradeSummary
//! ```
//!
//! Every indicator takes a bar slice and returns a value (or series of
//! values) padded with `NaN` during its warmup window; none of them mutate
//! or retain their input, so callers are free to recompute on a rolling
//! window each tick.

/// Technical indicators computed over OHLCV bar series.
pub mod indicator;

/// Win rate, profit factor, and running trade-log summaries.
pub mod metric;

pub use indicator::{
    adx, adx_latest, atr, atr_latest, htf_trend, htf_trend_latest, kdj, kdj_latest, ma_close,
    ma_volume, macd, macd_latest, rsi, rsi_latest, sma, KdjPoint, MacdPoint,
};
pub use metric::{ProfitFactor, TradeSummary, WinRate};
