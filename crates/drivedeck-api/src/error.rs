//! Gateway error taxonomy.

use thiserror::Error;

/// Errors surfaced by [`Gateway`](crate::Gateway) operations.
///
/// The gateway never swallows a failure; every operation ends in a value
/// or in one of these.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport, connection, or stream failure. Wraps the underlying
    /// cause and never carries a status code.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success response. The body is read eagerly and attached for
    /// diagnostics.
    #[error("server returned {status}")]
    Api { status: u16, body: String },

    /// Caller-side precondition failure detected before any network call.
    #[error("{0}")]
    Validation(String),

    /// Local read/write failure while streaming a file.
    #[error("local i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
