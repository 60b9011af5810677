//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so an empty file is a valid configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decision::PoolOptions;
use crate::observability::LoggerHandle;

/// Evaluator script registered when no `script_path` is configured.
pub const DEFAULT_EVALUATOR: &str = include_str!("../../lua/waf_gate_core.lua");

/// Root configuration for the `waf-gate` binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration for the demo server.
    pub listener: ListenerConfig,

    /// Gate settings.
    pub gate: GateConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Per-gate configuration. Resolved once at construction.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Redis connection URL.
    pub backend_url: String,

    /// Connect and evaluate timeout in milliseconds.
    pub timeout_ms: u64,

    /// Maximum pooled connections. Absent means no pool sizing.
    pub pool_size: Option<u32>,

    /// Suppress the per-request debug line.
    pub quiet_mode: bool,

    /// Peer addresses whose `X-Forwarded-For` is honored.
    /// Zero-padded IPv4 octets are read as decimal (`86.7.53.09`).
    pub trusted_proxies: Vec<String>,

    /// Evaluator script on disk; the bundled script is used when absent.
    pub script_path: Option<PathBuf>,

    /// Write client metadata to the backend after startup.
    pub announce: bool,

    /// Log sink for the request pipeline.
    #[serde(skip)]
    pub logger: LoggerHandle,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            backend_url: "redis://localhost:6379".to_string(),
            timeout_ms: 250,
            pool_size: None,
            quiet_mode: false,
            trusted_proxies: Vec::new(),
            script_path: None,
            announce: false,
            logger: LoggerHandle::default(),
        }
    }
}

impl GateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn pool_options(&self) -> Option<PoolOptions> {
        PoolOptions::from_pool_size(self.pool_size)
    }

    /// Replace the logger, keeping every other setting.
    pub fn with_logger(mut self, logger: LoggerHandle) -> Self {
        self.logger = logger;
        self
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
