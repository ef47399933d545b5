//! Errors surfaced to the user by the data session.

use crate::error::ObservationError;
use crate::models::StreamFailure;

/// Terminal outcome of a failed fetch. Each variant renders a message the
/// UI can show as-is; validation errors say what to fix, transport errors
/// suggest a retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The server rejected the request parameters.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The server failed while computing observations.
    #[error("Server error: {0}")]
    Server(String),

    /// The server could not be reached.
    #[error("Network error: {0}. Check your connection and retry.")]
    Network(String),

    /// The stream broke or timed out mid-flight.
    #[error("Stream interrupted: {0}. Please retry.")]
    Transport(String),

    /// The user aborted the fetch.
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Cancellation is informational rather than a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Transport(_))
    }
}

impl From<ObservationError> for ClientError {
    fn from(err: ObservationError) -> Self {
        match &err {
            ObservationError::InvalidInput(_) | ObservationError::Parse(_) => {
                ClientError::Validation(err.to_string())
            }
            ObservationError::Computation(_) => ClientError::Server(err.to_string()),
            ObservationError::Timeout(_) => ClientError::Transport(err.to_string()),
        }
    }
}

impl From<StreamFailure> for ClientError {
    fn from(failure: StreamFailure) -> Self {
        match failure.code.as_str() {
            "BAD_REQUEST" => ClientError::Validation(failure.message),
            "TIMEOUT" => ClientError::Transport(failure.message),
            _ => ClientError::Server(failure.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_distinct() {
        let errors = [
            ClientError::Validation("x".into()),
            ClientError::Server("x".into()),
            ClientError::Network("x".into()),
            ClientError::Transport("x".into()),
            ClientError::Cancelled,
        ];
        let messages: std::collections::HashSet<_> =
            errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(messages.len(), errors.len());
        assert!(ClientError::Cancelled.is_cancellation());
        assert!(ClientError::Network("down".into()).is_retryable());
        assert!(!ClientError::Validation("lat".into()).is_retryable());
    }

    #[test]
    fn test_from_stream_failure() {
        let timeout = ClientError::from(StreamFailure {
            code: "TIMEOUT".into(),
            message: "Computation timed out after 5000 ms".into(),
        });
        assert!(matches!(timeout, ClientError::Transport(_)));

        let internal = ClientError::from(StreamFailure {
            code: "INTERNAL_ERROR".into(),
            message: "boom".into(),
        });
        assert_eq!(internal, ClientError::Server("boom".into()));
    }

    #[test]
    fn test_from_observation_error() {
        let err = ClientError::from(ObservationError::invalid_input("frame_count"));
        assert_eq!(err.to_string(), "Invalid request: Invalid input: frame_count");
    }
}
