//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → GateConfig handed to Gate construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the gate is built; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - The logger is injected in code, never read from the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{evaluator_source, load_config, parse_config, ConfigError};
pub use schema::{AppConfig, GateConfig, ListenerConfig, ObservabilityConfig, DEFAULT_EVALUATOR};
pub use validation::{
    describe_errors, parse_proxy_address, validate_config, validate_gate, ValidationError,
};
