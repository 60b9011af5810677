//! Structured logging.
//!
//! # Responsibilities
//! - Define the logger capability the gate reports through
//! - Provide the default tracing-backed logger
//! - Initialize the tracing subscriber for the binary

use std::fmt;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log sink used by the request pipeline.
///
/// Levels map to the operator contract: `debug` once per request (unless
/// quiet), `warn` on a block, `error` on evaluation or address failures.
pub trait GateLogger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards gate log lines to `tracing` under the `waf_gate` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl GateLogger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "waf_gate", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "waf_gate", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "waf_gate", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "waf_gate", "{}", message);
    }
}

/// Shared handle to an injected logger.
#[derive(Clone)]
pub struct LoggerHandle(Arc<dyn GateLogger>);

impl LoggerHandle {
    pub fn new(logger: Arc<dyn GateLogger>) -> Self {
        Self(logger)
    }
}

impl Default for LoggerHandle {
    fn default() -> Self {
        Self(Arc::new(TracingLogger))
    }
}

impl std::ops::Deref for LoggerHandle {
    type Target = dyn GateLogger;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoggerHandle")
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
pub fn init_tracing(default_level: &str) {
    let fallback = format!("waf_gate={level},tower_http={level}", level = default_level);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
