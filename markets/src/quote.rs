// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Quote snapshot shape published by the market-data service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of a contract's quote. Consumers always read the
/// latest published snapshot; they never block waiting for a newer one.
///
/// Broker fields may be `NaN` before the first tick arrives; callers must
/// tolerate that (see [`Quote::is_usable`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub last_price: f64,
    pub pre_settlement: f64,
    pub pre_close: f64,
    pub highest: f64,
    pub lowest: f64,
    pub volume: f64,
    pub open_interest: f64,
    pub upper_limit: f64,
    pub lower_limit: f64,
    pub bid_price1: f64,
    pub ask_price1: f64,
    pub volume_multiple: f64,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// A quote is usable once a real last price has arrived.
    pub fn is_usable(&self) -> bool {
        self.last_price.is_finite() && self.last_price > 0.0
    }

    /// Sentinel returned by getters before the first tick, per spec §4.3:
    /// "getters must return an empty/zero sentinel if not ready".
    pub fn zero_sentinel() -> Self {
        Self {
            last_price: 0.0,
            pre_settlement: 0.0,
            pre_close: 0.0,
            highest: 0.0,
            lowest: 0.0,
            volume: 0.0,
            open_interest: 0.0,
            upper_limit: 0.0,
            lower_limit: 0.0,
            bid_price1: 0.0,
            ask_price1: 0.0,
            volume_multiple: 0.0,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Reported account snapshot, per spec §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountInfo {
    pub balance: f64,
    pub available: f64,
    pub float_profit: f64,
    pub position_profit: f64,
    pub close_profit: f64,
    pub margin: f64,
    pub commission: f64,
    pub static_balance: f64,
}

impl AccountInfo {
    /// `risk_ratio = margin / equity`, where equity is `balance`.
    pub fn risk_ratio(&self) -> f64 {
        if self.balance > 0.0 {
            self.margin / self.balance
        } else {
            0.0
        }
    }
}

/// Broker-reported LONG/SHORT volumes and average prices for a symbol.
/// May briefly disagree with the managed position after a fill and before
/// reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BrokerPosition {
    pub pos_long: u32,
    pub pos_short: u32,
    pub open_price_long: f64,
    pub open_price_short: f64,
    pub float_profit_long: f64,
    pub float_profit_short: f64,
}

impl BrokerPosition {
    pub fn is_flat(&self) -> bool {
        self.pos_long == 0 && self.pos_short == 0
    }
}
