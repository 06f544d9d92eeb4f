// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Position-manager failures (spec §3: "exactly one managed position may
//! exist per symbol at any time").

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TraderError {
    #[error("managed position already open for {0}")]
    AlreadyOpen(String),
    #[error("no managed position for {0}")]
    NotFound(String),
}
