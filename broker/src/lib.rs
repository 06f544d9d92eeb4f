//! Broker gateway integration: trait, event/order types, and a mock
//! connector usable without any live exchange session. A real connector is
//! available behind the `real_broker` feature.

mod api;
mod error;
mod mock;
#[cfg(feature = "real_broker")]
mod real;

pub use api::{backend_kind, new_backend, BrokerGateway, Credentials, TradeMode};
pub use error::BrokerError;
pub use mock::{CallbackEvent, MockConnector, OrderStatus, SendOrder};
#[cfg(feature = "real_broker")]
pub use real::RealConnector;
