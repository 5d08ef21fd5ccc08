//! Error types for the remote strategies behind the data gateway.
//!
//! These never cross the gateway boundary: every variant is turned into a
//! local fallback, and only a terminal failure reaches callers, as the
//! message inside `ApiResult::Failure`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Connection refused, DNS failure, TLS error or an interrupted body
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote call did not finish within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The backend answered with a non-success HTTP status
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered 2xx but the payload did not have the expected shape
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    /// No remote backend is configured
    #[error("Remote backend unavailable")]
    Unavailable,
}

impl GatewayError {
    pub fn transport(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            message: message.into(),
            source,
        }
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    /// Whether the failure came from the network rather than the payload.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout(_) | Self::Unavailable
        )
    }
}
