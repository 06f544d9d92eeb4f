// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `TradeConfig`: strategy parameters, persisted to `auto_config.json` (spec
//! §3/§6). This is the single source of runtime parameters — no crate reads
//! a process-wide mutable for any of these fields (spec §9 redesign note).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyMode {
    Swing,
    Intraday,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeConfig {
    pub contracts: Vec<String>,
    pub enabled: bool,
    pub max_lots: u32,
    pub max_positions: u32,
    pub signal_threshold: f64,
    pub analysis_interval_secs: u64,
    pub atr_sl_multiplier: f64,
    pub atr_tp_multiplier: f64,
    pub trail_step_atr: f64,
    pub trail_move_atr: f64,
    pub max_risk_per_trade: f64,
    pub max_risk_ratio: f64,
    pub close_before_market_close: bool,
    pub strategy_mode: StrategyMode,
    pub intraday_kline_duration_secs: u32,
    pub intraday_scan_interval_secs: u64,
    pub max_daily_loss_pct: f64,
    pub max_consecutive_losses: u32,
}

impl Default for TradeConfig {
    /// Intraday defaults, per spec §4.6/§4.7's named constants.
    fn default() -> Self {
        Self {
            contracts: Vec::new(),
            enabled: false,
            max_lots: 1,
            max_positions: 1,
            signal_threshold: 0.55,
            analysis_interval_secs: 300,
            atr_sl_multiplier: 1.2,
            atr_tp_multiplier: 2.0,
            trail_step_atr: 0.3,
            trail_move_atr: 0.15,
            max_risk_per_trade: 0.01,
            max_risk_ratio: 0.80,
            close_before_market_close: true,
            strategy_mode: StrategyMode::Intraday,
            intraday_kline_duration_secs: 300,
            intraday_scan_interval_secs: 15,
            max_daily_loss_pct: 0.03,
            max_consecutive_losses: 3,
        }
    }
}

impl TradeConfig {
    /// Swing-mode defaults: wider ATR multipliers, 2% per-trade risk, no
    /// intraday-only gates (spec §4.6/§4.7).
    pub fn swing_defaults() -> Self {
        Self {
            max_risk_per_trade: 0.02,
            atr_sl_multiplier: 1.5,
            atr_tp_multiplier: 3.0,
            trail_step_atr: 0.5,
            trail_move_atr: 0.25,
            strategy_mode: StrategyMode::Swing,
            ..Self::default()
        }
    }
}
