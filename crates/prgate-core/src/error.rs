//! Error types for the PR validation engine

use thiserror::Error;

/// Errors raised by a host API gateway implementation
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network or auth failure reaching the host API
    #[error("Host API transport error: {0}")]
    Transport(String),

    /// The requested resource does not exist on the host
    #[error("Not found on host: {0}")]
    NotFound(String),

    /// The host API answered with an unexpected status
    #[error("Host API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Failed to decode host API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// Errors that abort a validation run
///
/// Policy failures (a predicate evaluating to false) are never errors; they
/// surface through `ValidationResult` and the exit status instead.
#[derive(Error, Debug)]
pub enum GateError {
    /// The triggering event is not a pull request event
    #[error("Unsupported trigger event '{0}' (expected a pull request event)")]
    UnsupportedEvent(String),

    /// The event payload carries no usable pull request number
    #[error("Event payload has no pull request number")]
    MissingPullRequest,

    /// The event payload carries no repository identifier
    #[error("Event payload has no repository identifier")]
    MissingRepository,

    /// Event payload could not be parsed at all
    #[error("Failed to parse event payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// A pull request must have at least one commit to evaluate
    #[error("Pull request #{number} has no commits")]
    NoCommits { number: u64 },

    /// A host API call failed during data retrieval
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Result type for engine operations
pub type GateResult<T> = std::result::Result<T, GateError>;
