//! Failure taxonomy for API calls.
//!
//! Every failure carries one human-readable message: the server's structured
//! `detail` when it sent one, otherwise an operation-specific default. The
//! rendering layer never needs to branch on the variant. A 404 on the stored
//! report lookups is absence, not an error, and is surfaced as `None` by the
//! client instead of an `ApiError`.

use reqwest::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Application { status: StatusCode, message: String },

    /// The server answered 2xx but the body was not the expected shape.
    #[error("{message}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub(crate) fn network(message: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::Network {
            message: message.into(),
            source,
        }
    }

    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Application { status, .. } => Some(*status),
            _ => None,
        }
    }
}
