// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Errors shared between the mock backend and the feature-gated real backend.

/// Unified error type for the broker gateway.
#[non_exhaustive]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BrokerError {
    #[error("broker not initialized")]
    NotInitialized,
    #[error("invalid arguments")]
    InvalidArgs,
    #[error("waiting for server")]
    WaitingServer,
    #[error("no login session")]
    NoLogin,
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
    #[error("unknown exchange for base: {0}")]
    ExchangeUnknown(String),
    #[error("no open position for symbol: {0}")]
    NoPosition,
    #[error("order rejected: {0}")]
    OrderRejected(String),
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[cfg(feature = "real_broker")]
    #[error("real backend request failed: {0}")]
    RealBackend(String),
}
