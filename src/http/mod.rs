//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, connect info)
//!     → middleware/gate.rs (peer address, request snapshot)
//!     → client_ip.rs (trusted proxy resolution)
//!     → request.rs (InboundRequest for the fingerprint)
//!     → Gate::check
//!     → response.rs (block response) or the wrapped handler
//! ```

pub mod client_ip;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use client_ip::TrustedProxies;
pub use middleware::gate_middleware;
pub use request::HttpRequestView;
pub use response::{rejection_response, REJECTION_BODY, REJECTION_STATUS};
pub use server::{protect, GateServer};
