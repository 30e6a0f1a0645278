//! Errors raised by the course backend client.

use thiserror::Error;

use crate::stream::TransportError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, TLS or timeout failure.
    #[error("Request to course backend failed: {0}")]
    Transport(String),

    /// Non-success status; `message` is the backend's `detail` when it sent one.
    #[error("Course backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode course backend response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status reported by the backend, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<ClientError> for TransportError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Status { status, message } => TransportError::Status { status, message },
            other => TransportError::Connection(other.to_string()),
        }
    }
}
