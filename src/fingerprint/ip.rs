//! Numeric canonicalization of client addresses.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::observability::GateLogger;

/// Render an IP literal as its unsigned integer value in base 10.
///
/// IPv4 is tried before IPv6, so dotted quads always take the 32-bit path.
/// Unparsable or missing input is logged at error level and yields `""`.
pub fn canonicalize_ip(ip: Option<&str>, logger: &dyn GateLogger) -> String {
    let Some(raw) = ip else {
        logger.error("Error parsing IP address: no client address on request");
        return String::new();
    };

    if let Ok(v4) = raw.parse::<Ipv4Addr>() {
        return u32::from(v4).to_string();
    }
    if let Ok(v6) = raw.parse::<Ipv6Addr>() {
        return u128::from(v6).to_string();
    }

    logger.error(&format!("Error parsing IP address {raw}: not an IPv4 or IPv6 literal"));
    String::new()
}
