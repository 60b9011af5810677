//! Decision values and backend error definitions.

use thiserror::Error;

/// Normalized evaluator verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Blocked,
    Allowed,
    Passed,
    /// Any reply the gate does not know; treated as a pass.
    Unrecognized(String),
}

impl Decision {
    /// Parse a raw reply, ignoring case.
    pub fn from_reply(reply: &str) -> Self {
        let normalized = reply.to_lowercase();
        match normalized.as_str() {
            "blocked" => Decision::Blocked,
            "allowed" => Decision::Allowed,
            "passed" => Decision::Passed,
            _ => Decision::Unrecognized(normalized),
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Decision::Blocked)
    }

    /// Metric label for this decision.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Blocked => "blocked",
            Decision::Allowed => "allowed",
            Decision::Passed => "passed",
            Decision::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Errors that can occur while talking to the decision backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The round trip did not finish within the configured budget.
    #[error("backend call timed out")]
    Timeout,

    /// Redis transport or server error.
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    /// Reply did not have the expected shape.
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),

    /// Backend could not be configured (bad URL, empty pool).
    #[error("invalid backend configuration: {0}")]
    Config(String),
}

impl BackendError {
    /// True for connection-timeout-class failures.
    pub fn is_timeout(&self) -> bool {
        match self {
            BackendError::Timeout => true,
            BackendError::Redis(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Short failure category used in log lines.
    pub fn category(&self) -> &'static str {
        match self {
            BackendError::Timeout => "timeout",
            BackendError::Redis(e) if e.is_io_error() || e.is_connection_dropped() => "connection",
            BackendError::Redis(e) if e.kind() == redis::ErrorKind::TypeError => "response",
            BackendError::Redis(_) => "backend",
            BackendError::UnexpectedReply(_) => "response",
            BackendError::Config(_) => "config",
        }
    }
}

/// Category and message of a non-timeout failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureInfo {
    pub category: &'static str,
    pub message: String,
}

/// Result of one evaluate call as the gate consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationOutcome {
    Decision(Decision),
    TimedOut,
    Failed(FailureInfo),
}

impl From<Result<String, BackendError>> for EvaluationOutcome {
    fn from(result: Result<String, BackendError>) -> Self {
        match result {
            Ok(reply) => EvaluationOutcome::Decision(Decision::from_reply(&reply)),
            Err(e) if e.is_timeout() => EvaluationOutcome::TimedOut,
            Err(e) => EvaluationOutcome::Failed(FailureInfo {
                category: e.category(),
                message: e.to_string(),
            }),
        }
    }
}
