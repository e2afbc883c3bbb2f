use std::time::Duration;
use thiserror::Error;

/// Fallback shown when the remote service fails without an error descriptor
pub const REMOTE_FALLBACK_MESSAGE: &str = "Failed to fetch response from OpenAI.";

/// Failures of a single analysis attempt. None of them are retried.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network, DNS or TLS failure, or the body could not be read
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status, carrying the service's own message
    #[error("{0}")]
    Remote(String),

    /// The call succeeded but the JSON had an unexpected shape
    #[error("Invalid response from OpenAI")]
    MalformedResponse,

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// Display-time parse failures of otherwise valid nutrition text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("nutrition text has no ':' separator")]
    MissingSeparator,
}
