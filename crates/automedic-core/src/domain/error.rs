//! Error taxonomy for diagnosis resolution.

/// The message shown to a user for every failed submission, whatever the cause.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to get diagnosis. Please try again.";

/// Errors produced while resolving a diagnosis.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    /// The endpoint could not be reached or the connection dropped.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    #[error("API Error: {status_text}")]
    Status { status: u16, status_text: String },

    /// The response body was not a JSON object.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A submission was attempted while another one is still pending.
    #[error("a diagnosis request is already in flight")]
    SubmissionInFlight,

    /// A newer submission replaced this one before it completed.
    #[error("diagnosis request superseded by a newer submission")]
    Superseded,

    /// Invalid resolver configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for DiagnosisError {
    fn from(err: reqwest::Error) -> Self {
        DiagnosisError::Transport(err.to_string())
    }
}

/// Result type for diagnosis operations.
pub type Result<T> = std::result::Result<T, DiagnosisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_carries_status_text() {
        let err = DiagnosisError::Status {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "API Error: Internal Server Error");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let err: DiagnosisError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("malformed response body"));
    }
}
