// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `EngineStatus`: the well-formed snapshot `get_status` always returns
//! (spec §6, §7 "the `get_status` surface always returns a well-formed
//! object, with zeros for unavailable numerics").

use std::collections::HashMap;

use autotrader_integration::TradeConfig;
use autotrader_markets::{Bias, Direction};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ManagedPositionView {
    pub direction: Direction,
    pub entry: f64,
    pub atr: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub lots: u32,
    pub current_price: f64,
    pub float_pnl: f64,
    pub float_pnl_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PnlSummary {
    pub realized_today: f64,
    pub consecutive_losses: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub running: bool,
    pub contracts: Vec<String>,
    pub config: TradeConfig,
    /// Mirrors `config` — this implementation has no runtime-only overrides
    /// distinct from the persisted config (see `DESIGN.md`).
    pub effective_params: TradeConfig,
    pub ai_bias: HashMap<String, Bias>,
    pub daily_pnl: f64,
    pub daily_loss_count: u32,
    pub managed_positions: HashMap<String, ManagedPositionView>,
    pub pnl_summary: PnlSummary,
    pub account_pnl: f64,
    pub unrealized_pnl: f64,
    pub decisions_count: usize,
    pub trading_hours: bool,
}
