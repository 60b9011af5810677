//! HTTP request gate backed by a remote rule evaluator.
//!
//! Each request is reduced to a fixed-order fingerprint, evaluated by a Lua
//! script inside Redis, and either passed on or rejected with `403 Blocked`.
//! Backend failures never block traffic.

pub mod config;
pub mod decision;
pub mod fingerprint;
pub mod gate;
pub mod http;
pub mod observability;

pub use config::{AppConfig, GateConfig};
pub use decision::{DecisionBackend, RedisBackend};
pub use gate::{Gate, GateError, Verdict};
pub use http::{gate_middleware, protect, GateServer};
pub use observability::{GateLogger, LoggerHandle};
