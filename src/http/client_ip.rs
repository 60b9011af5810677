//! Client address resolution behind trusted proxies.
//!
//! # Responsibilities
//! - Hold the set of trusted proxy addresses
//! - Recover the real client from `X-Forwarded-For` when the peer is trusted
//!
//! # Design Decisions
//! - Never trust existing X-Forwarded-For from untrusted peers
//! - Walk the header right-to-left; the first untrusted hop is the client

use std::collections::HashSet;
use std::net::IpAddr;

use axum::http::HeaderMap;

use crate::config::parse_proxy_address;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Peers whose forwarding headers are honored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedProxies(HashSet<IpAddr>);

impl TrustedProxies {
    pub fn new(addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        Self(addrs.into_iter().map(|ip| ip.to_canonical()).collect())
    }

    /// Parse configured entries. Entries that are not IP literals are skipped.
    pub fn from_config(entries: &[String]) -> Self {
        Self::new(entries.iter().filter_map(|entry| match parse_proxy_address(entry) {
            Some(ip) => Some(ip),
            None => {
                tracing::warn!(entry = %entry, "Ignoring trusted proxy that is not an IP address");
                None
            }
        }))
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.contains(&ip.to_canonical())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The client address for a request received from `peer`.
    ///
    /// Mapped and plain forms match the same entry, but the returned
    /// address keeps the form it arrived in.
    pub fn resolve(&self, peer: IpAddr, headers: &HeaderMap) -> IpAddr {
        if !self.contains(&peer) {
            return peer;
        }

        let hops: Vec<IpAddr> = headers
            .get_all(X_FORWARDED_FOR)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .filter_map(|hop| hop.trim().parse::<IpAddr>().ok())
            .collect();

        hops.iter()
            .rev()
            .find(|hop| !self.contains(hop))
            .or_else(|| hops.first())
            .copied()
            .unwrap_or(peer)
    }
}
