// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Pure, allocation-light technical indicator functions. Every function here
//! takes a bar slice and returns a same-length vector padded with `NaN`
//! (or a neutral tag) during its warmup window — no indicator mutates or
//! retains its input.

pub mod adx;
pub mod atr;
pub mod htf;
pub mod kdj;
pub mod ma;
pub mod macd;
pub mod rsi;

pub use adx::{adx, adx_latest};
pub use atr::{atr, atr_latest};
pub use htf::{htf_trend, htf_trend_latest};
pub use kdj::{kdj, kdj_latest, KdjPoint};
pub use ma::{ma_close, ma_volume, sma};
pub use macd::{macd, macd_latest, MacdPoint};
pub use rsi::{rsi, rsi_latest};
