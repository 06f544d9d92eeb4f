// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation.
//! Logging setup shared by every worker thread (spec §7 propagation policy:
//! "no exception crosses a thread boundary" — each thread logs at its own
//! top level instead). `RUST_LOG` controls levels; defaults to `info`.
//!
//! ```rust,ignore
//! autotrader_core::logging::init_logging();
//! tracing::info!("scheduler started");
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Human-readable logging, for interactive use.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .init()
}

/// JSON logging, for ingestion by a log aggregator.
pub fn init_json_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .init()
}
