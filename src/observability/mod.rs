//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate pipeline produces:
//!     → logging.rs (injected GateLogger, per-request contract)
//!     → metrics.rs (decision counters, evaluation latency)
//!
//! Internal subsystems (pool, server, announce) log through tracing directly.
//! ```
//!
//! # Design Decisions
//! - The per-request log contract goes through an injected logger, never a global
//! - Default logger forwards to tracing so operators get one stream
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use logging::{GateLogger, LoggerHandle, TracingLogger};
