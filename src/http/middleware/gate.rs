//! Gate middleware.
//! Runs every request through the decision pipeline before the handler.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::gate::{Gate, Verdict};
use crate::http::request::HttpRequestView;
use crate::http::response::rejection_response;

/// Middleware function for `axum::middleware::from_fn_with_state`.
///
/// Runs `next` or returns the block response, never both.
pub async fn gate_middleware(
    State(gate): State<Arc<Gate>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Peer address is only present when served with connect info.
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client_ip = peer.map(|peer| gate.trusted_proxies().resolve(peer, request.headers()));
    let view = HttpRequestView::new(&request, client_ip);

    match gate.check(&view).await {
        Verdict::Continue => next.run(request).await,
        Verdict::Reject => rejection_response(),
    }
}
