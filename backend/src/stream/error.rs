//! Error types for the generation progress stream.

use thiserror::Error;

/// Failure reason shown when the server did not provide one.
pub const GENERIC_FAILURE_REASON: &str = "Document generation failed. Please try again.";

/// Transport-level faults raised by a [`ProgressSource`](super::ProgressSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection could not be established or dropped mid-stream.
    #[error("connection error: {0}")]
    Connection(String),

    /// The server answered the stream request with a non-success status.
    #[error("unexpected HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// The stream ended before any terminal event arrived.
    #[error("stream closed before a terminal event")]
    Closed,

    /// An event payload could not be decoded.
    #[error("malformed event payload: {0}")]
    Malformed(String),
}

/// Failed resolution of one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The pipeline reported an `error` stage.
    #[error("{reason}")]
    Failed { reason: String },

    /// Connection or payload fault before a terminal event.
    #[error("{reason}")]
    Transport { reason: String, detail: String },

    /// Closed locally by the caller.
    #[error("generation cancelled")]
    Cancelled,
}

impl GenerationError {
    /// Business failure with the server-provided message, or the generic notice if blank.
    pub fn failed(message: &str) -> Self {
        let reason = if message.trim().is_empty() {
            GENERIC_FAILURE_REASON.to_string()
        } else {
            message.to_string()
        };
        GenerationError::Failed { reason }
    }

    pub fn transport(detail: impl ToString) -> Self {
        GenerationError::Transport {
            reason: GENERIC_FAILURE_REASON.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Human-readable reason to surface to the user.
    pub fn reason(&self) -> &str {
        match self {
            GenerationError::Failed { reason } | GenerationError::Transport { reason, .. } => {
                reason
            }
            GenerationError::Cancelled => "generation cancelled",
        }
    }
}

impl From<TransportError> for GenerationError {
    fn from(err: TransportError) -> Self {
        GenerationError::transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_keeps_server_message_verbatim() {
        let err = GenerationError::failed("quota exceeded");
        assert_eq!(err.reason(), "quota exceeded");
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_blank_failure_message_falls_back_to_generic() {
        assert_eq!(GenerationError::failed("  ").reason(), GENERIC_FAILURE_REASON);
    }

    #[test]
    fn test_transport_uses_generic_reason_and_keeps_detail() {
        let err: GenerationError = TransportError::Closed.into();
        match &err {
            GenerationError::Transport { reason, detail } => {
                assert_eq!(reason, GENERIC_FAILURE_REASON);
                assert!(detail.contains("terminal event"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.to_string(), GENERIC_FAILURE_REASON);
    }
}
