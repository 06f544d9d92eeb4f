// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Failures from the AI bias oracle (spec §4.5 Layer A, §7
//! `LLMOracleError`). A failed refresh is never fatal: the caller keeps the
//! previous bias and retries on the next scheduled window.

#[derive(Debug, thiserror::Error)]
pub enum BiasOracleError {
    #[error("bias oracle request failed: {0}")]
    Request(String),
    #[error("bias oracle response timed out")]
    Timeout,
    #[error("bias oracle response could not be parsed: {0}")]
    Parse(String),
}
