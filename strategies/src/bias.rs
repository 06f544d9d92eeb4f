// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Layer A — the AI directional bias oracle (spec §4.5). The oracle itself
//! is an opaque external collaborator (spec §1 non-goals: "sentiment
//! scoring via external LLMs" is out of scope); this module owns only the
//! trait boundary, an HTTP client against whatever endpoint answers it, and
//! a deterministic mock for tests.

use std::collections::HashMap;
use std::time::Duration;

use autotrader_markets::AiSignal;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::error::BiasOracleError;

/// A per-symbol directional read, refreshed no more often than every 1800 s
/// by the scheduler's bias-refresher pool (spec §4.5, §4.8).
#[async_trait::async_trait]
pub trait BiasOracle: Send + Sync {
    async fn query(&self, symbol: &str) -> Result<(AiSignal, f64), BiasOracleError>;
}

/// Wire-format mirror of [`AiSignal`] matching the oracle's
/// `STRONG_BUY`/`BUY`/`HOLD`/`SELL`/`STRONG_SELL` vocabulary (spec §4.5),
/// kept separate from the internal enum so the external API's casing never
/// leaks past this module's serialization boundary.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum OracleSignal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl From<OracleSignal> for AiSignal {
    fn from(signal: OracleSignal) -> Self {
        match signal {
            OracleSignal::StrongBuy => AiSignal::StrongBuy,
            OracleSignal::Buy => AiSignal::Buy,
            OracleSignal::Hold => AiSignal::Hold,
            OracleSignal::Sell => AiSignal::Sell,
            OracleSignal::StrongSell => AiSignal::StrongSell,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OracleResponse {
    signal: OracleSignal,
    composite_score: f64,
}

/// Queries a configured HTTP endpoint with `{"symbol": ...}` and expects back
/// `{"signal": "STRONG_BUY"|"BUY"|"HOLD"|"SELL"|"STRONG_SELL", "composite_score": f64}`.
#[derive(Debug)]
pub struct HttpBiasOracle {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBiasOracle {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client builds with a fixed timeout"),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait::async_trait]
impl BiasOracle for HttpBiasOracle {
    async fn query(&self, symbol: &str) -> Result<(AiSignal, f64), BiasOracleError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "symbol": symbol }))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    BiasOracleError::Timeout
                } else {
                    BiasOracleError::Request(err.to_string())
                }
            })?;
        let parsed: OracleResponse = response
            .json()
            .await
            .map_err(|err| BiasOracleError::Parse(err.to_string()))?;
        Ok((parsed.signal.into(), parsed.composite_score))
    }
}

/// Deterministic oracle for tests and examples: returns a fixed response per
/// symbol, `(Hold, 0.0)` for anything unregistered, and can be told to fail
/// to exercise the "failure keeps previous bias" path.
#[derive(Debug, Default)]
pub struct MockBiasOracle {
    responses: Mutex<HashMap<String, Result<(AiSignal, f64), String>>>,
}

impl MockBiasOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, symbol: impl Into<String>, signal: AiSignal, composite_score: f64) {
        self.responses
            .lock()
            .insert(symbol.into(), Ok((signal, composite_score)));
    }

    pub fn set_failure(&self, symbol: impl Into<String>, message: impl Into<String>) {
        self.responses.lock().insert(symbol.into(), Err(message.into()));
    }
}

#[async_trait::async_trait]
impl BiasOracle for MockBiasOracle {
    async fn query(&self, symbol: &str) -> Result<(AiSignal, f64), BiasOracleError> {
        match self.responses.lock().get(symbol) {
            Some(Ok(response)) => Ok(*response),
            Some(Err(message)) => Err(BiasOracleError::Request(message.clone())),
            None => Ok((AiSignal::Hold, 0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_hold_for_unregistered_symbol() {
        let oracle = MockBiasOracle::new();
        let (signal, score) = oracle.query("C2605").await.unwrap();
        assert_eq!(signal, AiSignal::Hold);
        assert_eq!(score, 0.0);
    }

    #[tokio::test]
    async fn mock_can_be_configured_to_fail() {
        let oracle = MockBiasOracle::new();
        oracle.set_failure("C2605", "rate limited");
        let err = oracle.query("C2605").await.unwrap_err();
        assert!(matches!(err, BiasOracleError::Request(_)));
    }

    #[tokio::test]
    async fn mock_returns_the_configured_response() {
        let oracle = MockBiasOracle::new();
        oracle.set_response("C2605", AiSignal::StrongBuy, 0.8);
        let (signal, score) = oracle.query("C2605").await.unwrap();
        assert_eq!(signal, AiSignal::StrongBuy);
        assert_eq!(score, 0.8);
    }
}
