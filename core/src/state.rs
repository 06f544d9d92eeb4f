// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `SchedulerState`: everything a cycle reads or mutates, behind one mutex
//! never held across I/O or broker calls (spec §5 shared-resource policy).

use autotrader_integration::TradeConfig;
use autotrader_risk::DailyRiskState;
use autotrader_trader::PositionManager;
use chrono::NaiveDate;

use crate::bias::BiasCache;

#[derive(Debug)]
pub struct SchedulerState {
    pub config: TradeConfig,
    pub positions: PositionManager,
    pub decisions: Vec<autotrader_integration::TradeDecision>,
    pub daily: DailyRiskState,
    pub bias: BiasCache,
}

impl SchedulerState {
    pub fn new(config: TradeConfig, positions: PositionManager, decisions: Vec<autotrader_integration::TradeDecision>, today: NaiveDate) -> Self {
        Self {
            config,
            positions,
            decisions,
            daily: DailyRiskState::new(today),
            bias: BiasCache::new(),
        }
    }

    /// Records a decision, dropping the oldest once the in-memory cap is
    /// exceeded (spec §3/§4.4).
    pub fn record_decision(&mut self, decision: autotrader_integration::TradeDecision) {
        autotrader_integration::decision::push_capped(&mut self.decisions, decision);
    }
}
