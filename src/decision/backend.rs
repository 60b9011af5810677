//! Decision backend capability.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::decision::types::BackendError;

/// Opaque reference to a registered evaluator script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptHandle(String);

impl ScriptHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client details written by the startup announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMetadata {
    pub name: String,
    pub version: String,
    /// Milliseconds since the epoch.
    pub started_at: u128,
}

impl ClientMetadata {
    /// Metadata describing this build, stamped now.
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
        }
    }
}

/// Remote rule evaluator.
///
/// Implementations may be any store with server-side scripting, or an
/// in-process engine. Every call is bounded by the caller's timeout.
#[async_trait]
pub trait DecisionBackend: Send + Sync {
    /// Register the evaluator source and return its handle.
    async fn register(&self, source: &str, timeout: Duration) -> Result<ScriptHandle, BackendError>;

    /// Run the registered evaluator with positional arguments.
    async fn evaluate(
        &self,
        handle: &ScriptHandle,
        args: &[String],
        timeout: Duration,
    ) -> Result<String, BackendError>;

    /// Record client metadata with the backend. No-op unless overridden.
    async fn announce(&self, _metadata: &ClientMetadata, _timeout: Duration) -> Result<(), BackendError> {
        Ok(())
    }
}
