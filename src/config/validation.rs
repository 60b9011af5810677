//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, pool size > 0)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function of the config

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

use crate::config::schema::{AppConfig, GateConfig};

const BACKEND_SCHEMES: [&str; 4] = ["redis", "rediss", "redis+unix", "unix"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("gate.backend_url '{url}' is invalid: {reason}")]
    BackendUrl { url: String, reason: String },

    #[error("gate.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("gate.pool_size must be greater than zero")]
    ZeroPoolSize,

    #[error("gate.trusted_proxies entry '{0}' is not an IP address")]
    TrustedProxy(String),

    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("listener.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,
}

/// Parse a trusted proxy entry.
///
/// Accepts any IP literal, plus dotted IPv4 with zero-padded decimal
/// octets (`86.7.53.09` is `86.7.53.9`).
pub fn parse_proxy_address(entry: &str) -> Option<IpAddr> {
    let entry = entry.trim();
    if let Ok(ip) = entry.parse::<IpAddr>() {
        return Some(ip);
    }

    let octets: Vec<u8> = entry
        .split('.')
        .map(|part| {
            if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse::<u8>().ok()
        })
        .collect::<Option<_>>()?;
    match octets[..] {
        [a, b, c, d] => Some(IpAddr::V4(Ipv4Addr::new(a, b, c, d))),
        _ => None,
    }
}

/// Join validation errors into one line for error messages.
pub fn describe_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate the whole binary configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = gate_errors(&config.gate);

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate gate settings alone.
pub fn validate_gate(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let errors = gate_errors(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn gate_errors(config: &GateConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.backend_url) {
        Ok(url) if !BACKEND_SCHEMES.contains(&url.scheme()) => {
            errors.push(ValidationError::BackendUrl {
                url: config.backend_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::BackendUrl {
            url: config.backend_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.pool_size == Some(0) {
        errors.push(ValidationError::ZeroPoolSize);
    }
    for proxy in &config.trusted_proxies {
        if parse_proxy_address(proxy).is_none() {
            errors.push(ValidationError::TrustedProxy(proxy.clone()));
        }
    }

    errors
}
