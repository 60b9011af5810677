//! Fingerprint construction.
//!
//! # Responsibilities
//! - Read the request attributes the evaluator script consumes
//! - Stamp the request with wall-clock milliseconds
//! - Produce the positional argument vector in its fixed order

use std::time::{SystemTime, UNIX_EPOCH};

use crate::fingerprint::ip::canonicalize_ip;
use crate::observability::GateLogger;

/// Positional names of the fingerprint fields, in wire order.
pub const FIELD_NAMES: [&str; 8] = [
    "ip",
    "decimal_ip",
    "time",
    "user_agent",
    "path",
    "query",
    "host",
    "method",
];

const USER_AGENT: &str = "User-Agent";

/// What the fingerprint needs to know about a request.
pub trait InboundRequest {
    /// Client address as resolved by the HTTP layer.
    fn client_ip(&self) -> Option<&str>;
    fn path(&self) -> &str;
    /// Raw query string without the leading `?`.
    fn query(&self) -> Option<&str>;
    fn host(&self) -> Option<&str>;
    fn method(&self) -> &str;
    /// Case-insensitive header lookup.
    fn header(&self, name: &str) -> Option<&str>;
}

/// The stringified request attributes sent to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub ip: String,
    pub decimal_ip: String,
    pub time: String,
    pub user_agent: String,
    pub path: String,
    pub query: String,
    pub host: String,
    pub method: String,
}

impl Fingerprint {
    /// Build a fingerprint stamped with the current time.
    pub fn build<R>(request: &R, logger: &dyn GateLogger) -> Self
    where
        R: InboundRequest + ?Sized,
    {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self::build_at(request, logger, millis)
    }

    /// Build a fingerprint with an explicit epoch-millisecond timestamp.
    pub fn build_at<R>(request: &R, logger: &dyn GateLogger, millis: u128) -> Self
    where
        R: InboundRequest + ?Sized,
    {
        let client_ip = request.client_ip();
        Self {
            ip: owned(client_ip),
            decimal_ip: canonicalize_ip(client_ip, logger),
            time: millis.to_string(),
            user_agent: owned(request.header(USER_AGENT)),
            path: request.path().to_string(),
            query: owned(request.query()),
            host: owned(request.host()),
            method: request.method().to_string(),
        }
    }

    /// The argument vector in wire order.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.ip.clone(),
            self.decimal_ip.clone(),
            self.time.clone(),
            self.user_agent.clone(),
            self.path.clone(),
            self.query.clone(),
            self.host.clone(),
            self.method.clone(),
        ]
    }
}

fn owned(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Quiet;

    impl GateLogger for Quiet {
        fn debug(&self, _: &str) {}
        fn info(&self, _: &str) {}
        fn warn(&self, _: &str) {}
        fn error(&self, _: &str) {}
    }

    struct StubRequest {
        ip: Option<&'static str>,
        query: Option<&'static str>,
        host: Option<&'static str>,
        headers: HashMap<String, &'static str>,
    }

    impl InboundRequest for StubRequest {
        fn client_ip(&self) -> Option<&str> {
            self.ip
        }
        fn path(&self) -> &str {
            "/login"
        }
        fn query(&self) -> Option<&str> {
            self.query
        }
        fn host(&self) -> Option<&str> {
            self.host
        }
        fn method(&self) -> &str {
            "POST"
        }
        fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(&name.to_ascii_lowercase()).copied()
        }
    }

    fn stub() -> StubRequest {
        StubRequest {
            ip: Some("127.0.0.1"),
            query: Some("next=%2Fhome"),
            host: Some("example.com:8080"),
            headers: HashMap::from([("user-agent".to_string(), "curl/8.4.0")]),
        }
    }

    #[test]
    fn test_argument_order() {
        let fp = Fingerprint::build_at(&stub(), &Quiet, 1_700_000_000_123);
        assert_eq!(
            fp.to_args(),
            vec![
                "127.0.0.1",
                "2130706433",
                "1700000000123",
                "curl/8.4.0",
                "/login",
                "next=%2Fhome",
                "example.com:8080",
                "POST",
            ]
        );
        assert_eq!(fp.to_args().len(), FIELD_NAMES.len());
    }

    #[test]
    fn test_absent_values_become_empty() {
        let request = StubRequest {
            ip: None,
            query: None,
            host: None,
            headers: HashMap::new(),
        };
        let fp = Fingerprint::build_at(&request, &Quiet, 0);
        assert_eq!(fp.ip, "");
        assert_eq!(fp.decimal_ip, "");
        assert_eq!(fp.user_agent, "");
        assert_eq!(fp.query, "");
        assert_eq!(fp.host, "");
        assert_eq!(fp.time, "0");
    }

    #[test]
    fn test_build_uses_wall_clock() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        let fp = Fingerprint::build(&stub(), &Quiet);
        let stamped: u128 = fp.time.parse().unwrap();
        assert!(stamped >= before);
    }
}
