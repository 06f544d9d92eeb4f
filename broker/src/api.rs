// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Backend-neutral gateway trait. Callers depend on [`BrokerGateway`] only;
//! which concrete connector backs it (mock, or a real exchange session
//! behind the `real_broker` feature) is resolved once at startup by
//! [`new_backend`].

use crate::{error::BrokerError, mock, CallbackEvent, SendOrder};
use core::any::{Any, TypeId};
use std::env;
use tokio::sync::mpsc::UnboundedReceiver;

/// Trading mode requested at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeMode {
    /// Paper trading against the exchange's simulated matching engine.
    Sim,
    /// Live trading, routed through a real futures brokerage account.
    Live,
}

/// Login credentials and account routing for a broker session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    pub trade_mode: TradeMode,
    /// Required for [`TradeMode::Live`]: the brokerage's identifier.
    pub broker_id: String,
    /// Required for [`TradeMode::Live`]: the funding account number.
    pub broker_account: String,
    /// Required for [`TradeMode::Live`]: the trading password.
    pub broker_password: String,
}

impl Credentials {
    /// Loads credentials from environment variables.
    ///
    /// - `BROKER_USER`, `BROKER_PASSWORD` (required)
    /// - `BROKER_TRADE_MODE` = `sim` (default) or `live`
    /// - `BROKER_ID`, `BROKER_ACCOUNT`, `BROKER_ACCOUNT_PASSWORD` (required when `live`)
    pub fn from_env() -> Result<Self, BrokerError> {
        let user = env::var("BROKER_USER")
            .map_err(|_| BrokerError::ConnectionFailed("BROKER_USER not set".into()))?;
        let password = env::var("BROKER_PASSWORD")
            .map_err(|_| BrokerError::ConnectionFailed("BROKER_PASSWORD not set".into()))?;
        let trade_mode = match env::var("BROKER_TRADE_MODE").as_deref() {
            Ok("live") => TradeMode::Live,
            _ => TradeMode::Sim,
        };
        let broker_id = env::var("BROKER_ID").unwrap_or_default();
        let broker_account = env::var("BROKER_ACCOUNT").unwrap_or_default();
        let broker_password = env::var("BROKER_ACCOUNT_PASSWORD").unwrap_or_default();
        if trade_mode == TradeMode::Live && (broker_id.is_empty() || broker_account.is_empty()) {
            return Err(BrokerError::ConnectionFailed(
                "live trade mode requires BROKER_ID and BROKER_ACCOUNT".into(),
            ));
        }
        Ok(Self {
            user,
            password,
            trade_mode,
            broker_id,
            broker_account,
            broker_password,
        })
    }
}

/// Abstract broker gateway: the single point of contact between the trading
/// core and whatever connects it to an exchange (mock simulator, or a real
/// session behind `real_broker`).
#[async_trait::async_trait]
pub trait BrokerGateway: Send + Sync + Any {
    /// Logs in and returns the event stream the caller should drain.
    async fn initialize_login(
        &self,
        creds: &Credentials,
    ) -> Result<UnboundedReceiver<CallbackEvent>, BrokerError>;

    /// Subscribes to quote ticks for a broker-form symbol (e.g. `DCE.c2605`).
    fn subscribe_quote(&self, symbol: &str) -> Result<(), BrokerError>;

    /// Cancels a quote subscription.
    fn unsubscribe_quote(&self, symbol: &str) -> Result<(), BrokerError>;

    /// Subscribes to position updates for a broker-form symbol.
    fn subscribe_position(&self, symbol: &str) -> Result<(), BrokerError>;

    /// Subscribes to a K-line series for a broker-form symbol at the given
    /// bar duration, backfilling `count` historical bars before switching to
    /// live bar close events.
    fn subscribe_kline(&self, symbol: &str, duration_secs: u32, count: usize) -> Result<(), BrokerError>;

    /// Submits an order, returning the broker-assigned order id immediately;
    /// the terminal status arrives asynchronously as [`CallbackEvent::OrderUpdated`].
    fn send_order(&self, order: &SendOrder) -> Result<String, BrokerError>;

    /// Cancels a previously submitted order by id.
    fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError>;

    /// Releases resources held by the backend (background tasks, sessions).
    fn shutdown(&self) {}
}

#[async_trait::async_trait]
impl BrokerGateway for mock::MockConnector {
    async fn initialize_login(
        &self,
        _creds: &Credentials,
    ) -> Result<UnboundedReceiver<CallbackEvent>, BrokerError> {
        self.initialize_login().await
    }
    fn subscribe_quote(&self, symbol: &str) -> Result<(), BrokerError> {
        self.subscribe_quote(symbol)
    }
    fn unsubscribe_quote(&self, symbol: &str) -> Result<(), BrokerError> {
        self.unsubscribe_quote(symbol)
    }
    fn subscribe_position(&self, symbol: &str) -> Result<(), BrokerError> {
        self.subscribe_position(symbol)
    }
    fn subscribe_kline(&self, symbol: &str, duration_secs: u32, count: usize) -> Result<(), BrokerError> {
        self.subscribe_kline(symbol, duration_secs, count)
    }
    fn send_order(&self, order: &SendOrder) -> Result<String, BrokerError> {
        self.send_order(order)
    }
    fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError> {
        self.cancel_order(order_id)
    }
    fn shutdown(&self) {
        self.shutdown();
    }
}

#[cfg(feature = "real_broker")]
#[async_trait::async_trait]
impl BrokerGateway for crate::real::RealConnector {
    async fn initialize_login(
        &self,
        creds: &Credentials,
    ) -> Result<UnboundedReceiver<CallbackEvent>, BrokerError> {
        crate::real::RealConnector::initialize_login(self, creds).await
    }
    fn subscribe_quote(&self, symbol: &str) -> Result<(), BrokerError> {
        crate::real::RealConnector::subscribe_quote(self, symbol)
    }
    fn unsubscribe_quote(&self, symbol: &str) -> Result<(), BrokerError> {
        crate::real::RealConnector::unsubscribe_quote(self, symbol)
    }
    fn subscribe_position(&self, symbol: &str) -> Result<(), BrokerError> {
        crate::real::RealConnector::subscribe_position(self, symbol)
    }
    fn subscribe_kline(&self, symbol: &str, duration_secs: u32, count: usize) -> Result<(), BrokerError> {
        crate::real::RealConnector::subscribe_kline(self, symbol, duration_secs, count)
    }
    fn send_order(&self, order: &SendOrder) -> Result<String, BrokerError> {
        crate::real::RealConnector::send_order(self, order)
    }
    fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError> {
        crate::real::RealConnector::cancel_order(self, order_id)
    }
    fn shutdown(&self) {
        crate::real::RealConnector::shutdown(self)
    }
}

/// Backend selection:
/// 1. `BROKER_FORCE_MOCK=1` -> mock.
/// 2. Else, with the `real_broker` feature compiled in, attempt the real
///    connector.
/// 3. Fallback: mock.
pub fn new_backend() -> Result<Box<dyn BrokerGateway>, BrokerError> {
    let force_mock = env::var("BROKER_FORCE_MOCK")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if force_mock {
        return Ok(Box::new(mock::MockConnector::new()?));
    }
    #[cfg(feature = "real_broker")]
    {
        match crate::real::RealConnector::new() {
            Ok(conn) => return Ok(Box::new(conn)),
            Err(e) => {
                eprintln!("[broker] real backend unavailable, falling back to mock: {e}");
            }
        }
    }
    Ok(Box::new(mock::MockConnector::new()?))
}

/// Returns the concrete backend kind, for logging/diagnostics.
pub fn backend_kind(b: &dyn BrokerGateway) -> &'static str {
    if b.type_id() == TypeId::of::<mock::MockConnector>() {
        return "mock";
    }
    #[cfg(feature = "real_broker")]
    {
        if b.type_id() == TypeId::of::<crate::real::RealConnector>() {
            return "real";
        }
    }
    "unknown"
}
