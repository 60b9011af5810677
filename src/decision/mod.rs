//! Remote decision subsystem.
//!
//! # Data Flow
//! ```text
//! Gate construction:
//!     → client.rs (connect, SCRIPT LOAD → ScriptHandle)
//!     → pool.rs (eager minimum connections)
//!
//! Per request:
//!     → backend.rs (DecisionBackend::evaluate with timeout)
//!     → types.rs (raw reply / error → EvaluationOutcome)
//! ```
//!
//! # Design Decisions
//! - The evaluator is an opaque capability behind one trait
//! - Timeouts are distinct from every other failure
//! - The script handle is loaded once and never refreshed

pub mod backend;
pub mod client;
pub mod pool;
pub mod types;

pub use backend::{ClientMetadata, DecisionBackend, ScriptHandle};
pub use pool::{ConnectionPool, PoolOptions, MIN_POOL_CONNECTIONS};
pub use client::RedisBackend;
pub use types::{BackendError, Decision, EvaluationOutcome, FailureInfo};
