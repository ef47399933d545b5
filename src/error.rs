//! Error types for observation computation.
//!
//! Every failure in the computation pipeline (single frames, batches and
//! streams) is reported as an [`ObservationError`]. The HTTP layer maps the
//! variants onto status codes, and the client session maps them onto
//! user-facing messages.

/// Result type for observation operations.
pub type ObservationResult<T> = Result<T, ObservationError>;

/// Error type for the observation pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObservationError {
    /// Coordinates, frame count or time range rejected before any computation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A date or time string could not be parsed.
    #[error("Invalid date/time format: {0}")]
    Parse(String),

    /// The ephemeris produced an unusable value for a valid input.
    #[error("Computation error: {0}")]
    Computation(String),

    /// A frame, or a whole one-shot batch, exceeded its time budget.
    #[error("Computation timed out after {0} ms")]
    Timeout(u64),
}

impl ObservationError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ObservationError::InvalidInput(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ObservationError::Parse(message.into())
    }

    pub fn computation(message: impl Into<String>) -> Self {
        ObservationError::Computation(message.into())
    }

    /// Whether the caller can fix this error by changing the request.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ObservationError::InvalidInput(_) | ObservationError::Parse(_)
        )
    }

    /// Error code for programmatic handling, shared by HTTP bodies and
    /// stream error events.
    pub fn code(&self) -> &'static str {
        match self {
            ObservationError::InvalidInput(_) | ObservationError::Parse(_) => "BAD_REQUEST",
            ObservationError::Computation(_) => "INTERNAL_ERROR",
            ObservationError::Timeout(_) => "TIMEOUT",
        }
    }
}

impl From<chrono::ParseError> for ObservationError {
    fn from(err: chrono::ParseError) -> Self {
        ObservationError::Parse(err.to_string())
    }
}
