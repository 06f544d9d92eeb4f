// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Errors surfaced by the market-data service's public handle (spec §4.3).

use autotrader_broker::BrokerError;

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("broker gateway: {0}")]
    Broker(#[from] BrokerError),
    #[error("market-data worker is not running")]
    WorkerDown,
    #[error("order submission timed out")]
    OrderTimeout,
}
