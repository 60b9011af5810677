//! Request fingerprinting.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → ip.rs (client address → unsigned decimal string)
//!     → builder.rs (fixed-order argument vector)
//!     → decision backend (positional script arguments)
//! ```
//!
//! # Design Decisions
//! - Argument order is a wire contract with the evaluator script
//! - Every field is a string; absent values become ""
//! - Nothing here performs I/O or returns an error

pub mod builder;
pub mod ip;

pub use builder::{Fingerprint, InboundRequest, FIELD_NAMES};
pub use ip::canonicalize_ip;
