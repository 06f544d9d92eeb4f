// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! `EngineError`: the scheduler's own failures plus every lower-layer error
//! the scheduler can observe, aggregated by `#[from]` (spec §7's four error
//! kinds, mapped onto the crates that actually raise them).

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Missing broker credentials, an unknown contract, or a nonsensical
    /// config (spec §7 `ConfigurationError`): surfaced immediately, the
    /// scheduler refuses to start.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("broker gateway: {0}")]
    Broker(#[from] autotrader_broker::BrokerError),

    #[error(transparent)]
    Execution(#[from] autotrader_execution::ExecutionError),

    #[error(transparent)]
    Trader(#[from] autotrader_trader::TraderError),

    #[error(transparent)]
    BiasOracle(#[from] autotrader_strategies::BiasOracleError),

    /// A symbol named in a control-surface call that the scheduler does
    /// not currently track.
    #[error("unknown contract: {0}")]
    UnknownContract(String),

    /// `remove_contract` on a symbol with an open managed position (spec
    /// §6: "removing a symbol with an open managed position fails").
    #[error("cannot remove {0}: an open managed position exists")]
    PositionOpen(String),

    /// The scheduler is already running; `start` is not re-entrant.
    #[error("scheduler is already running")]
    AlreadyRunning,
}
