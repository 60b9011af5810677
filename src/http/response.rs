//! Responses written by the gate itself.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Status of the block response.
pub const REJECTION_STATUS: StatusCode = StatusCode::FORBIDDEN;

/// Body of the block response, byte for byte.
pub const REJECTION_BODY: &str = "Blocked";

/// The fixed response for a blocked request.
pub fn rejection_response() -> Response {
    (REJECTION_STATUS, REJECTION_BODY).into_response()
}
