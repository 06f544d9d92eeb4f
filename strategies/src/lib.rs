// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations, rust_2018_idioms)]

//! Two-layer entry signal pipeline (spec §4.5): the AI directional bias
//! oracle (Layer A) and the 7-factor intraday composite scorer (Layer B),
//! combined under the v6 alignment rules.

pub mod alignment;
pub mod bias;
pub mod composite;
pub mod error;
pub mod evaluator;
pub mod factors;

pub use bias::{BiasOracle, HttpBiasOracle, MockBiasOracle};
pub use error::BiasOracleError;
pub use evaluator::{evaluate_intraday, evaluate_swing, Evaluation};
pub use factors::Factors;
