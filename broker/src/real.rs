// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Real backend stub, behind the `real_broker` feature.
//!
//! The underlying exchange library used in production is a Python asyncio
//! service (it owns its own event loop and is not FFI-loadable); a real
//! deployment bridges to it over a local HTTP sidecar rather than linking it
//! in-process. This connector is wired into [`crate::BrokerGateway`] but has
//! no sidecar to talk to in this workspace, so every call fails fast with
//! [`BrokerError::RealBackend`] instead of pretending to succeed.

use crate::api::Credentials;
use crate::error::BrokerError;
use crate::{CallbackEvent, SendOrder};
use tokio::sync::mpsc::UnboundedReceiver;

pub struct RealConnector {
    base_url: String,
    client: reqwest::Client,
}

impl RealConnector {
    pub fn new() -> Result<Self, BrokerError> {
        let base_url = std::env::var("BROKER_SIDECAR_URL")
            .map_err(|_| BrokerError::ConnectionFailed("BROKER_SIDECAR_URL not set".into()))?;
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub async fn initialize_login(
        &self,
        _creds: &Credentials,
    ) -> Result<UnboundedReceiver<CallbackEvent>, BrokerError> {
        Err(BrokerError::RealBackend(format!(
            "sidecar at {} not reachable from this build",
            self.base_url
        )))
    }

    pub fn subscribe_quote(&self, _symbol: &str) -> Result<(), BrokerError> {
        Err(BrokerError::RealBackend("not implemented".into()))
    }

    pub fn unsubscribe_quote(&self, _symbol: &str) -> Result<(), BrokerError> {
        Err(BrokerError::RealBackend("not implemented".into()))
    }

    pub fn subscribe_position(&self, _symbol: &str) -> Result<(), BrokerError> {
        Err(BrokerError::RealBackend("not implemented".into()))
    }

    pub fn subscribe_kline(&self, _symbol: &str, _duration_secs: u32, _count: usize) -> Result<(), BrokerError> {
        Err(BrokerError::RealBackend("not implemented".into()))
    }

    pub fn send_order(&self, _order: &SendOrder) -> Result<String, BrokerError> {
        Err(BrokerError::RealBackend("not implemented".into()))
    }

    pub fn cancel_order(&self, _order_id: &str) -> Result<(), BrokerError> {
        Err(BrokerError::RealBackend("not implemented".into()))
    }

    pub fn shutdown(&self) {}
}
