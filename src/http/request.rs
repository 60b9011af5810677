//! Request view handed to the fingerprint builder.
//!
//! # Responsibilities
//! - Capture the request parts the fingerprint reads
//! - Carry the resolved client address
//!
//! # Design Decisions
//! - Owns its data so the middleware future stays `Send` while evaluating
//! - Host comes from the `Host` header, falling back to the URI authority

use std::net::IpAddr;

use axum::http::{header, HeaderMap, Request};

use crate::fingerprint::InboundRequest;

/// Owned snapshot of an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequestView {
    client_ip: Option<String>,
    method: String,
    path: String,
    query: Option<String>,
    host: Option<String>,
    headers: HeaderMap,
}

impl HttpRequestView {
    pub fn new<B>(request: &Request<B>, client_ip: Option<IpAddr>) -> Self {
        let uri = request.uri();
        let headers = request.headers();
        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|authority| authority.to_string()));

        Self {
            client_ip: client_ip.map(|ip| ip.to_string()),
            method: request.method().to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            host,
            headers: headers.clone(),
        }
    }
}

impl InboundRequest for HttpRequestView {
    fn client_ip(&self) -> Option<&str> {
        self.client_ip.as_deref()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
