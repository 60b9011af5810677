//! Request gate: the fingerprint → evaluate → decide pipeline.
//!
//! # States
//! ```text
//! START → FINGERPRINTED → EVALUATED → {CONTINUE, REJECT}
//!
//! FINGERPRINTED → CONTINUE: evaluate timed out or failed (fail open)
//! EVALUATED → REJECT:       reply is "blocked" (any case)
//! EVALUATED → CONTINUE:     any other reply
//! ```
//!
//! # Design Decisions
//! - Fail open: backend trouble never blocks traffic
//! - Construction is the only place a backend error surfaces
//! - Backend, script handle, and logger are shared read-only after construction

pub mod error;
pub mod orchestrator;

pub use error::GateError;
pub use orchestrator::{Gate, Verdict};
