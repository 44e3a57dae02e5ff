//! Provider client error types.
//!
//! These never cross the [`VerificationApi`](crate::VerificationApi)
//! boundary: the verification methods fold them into a failed
//! [`VerificationOutcome`](crate::VerificationOutcome). They are returned
//! directly only by the record-keeping client.

/// Errors from provider and record-endpoint calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error (connection, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The remote returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        /// Provider-supplied message extracted from the error body, if any.
        message: Option<String>,
        body: String,
    },
    /// Response body could not be decoded.
    #[error("failed to deserialize response from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl ClientError {
    /// Whether the call completed and the remote answered (as opposed to a
    /// transport or decoding failure).
    pub fn is_remote_rejection(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_and_body() {
        let err = ClientError::Api {
            endpoint: "POST /pan-api/fetch".into(),
            status: 422,
            message: Some("Invalid PAN".into()),
            body: "{\"error\":{}}".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("/pan-api/fetch"));
        assert!(err.is_remote_rejection());
    }

    #[test]
    fn deserialization_is_not_a_rejection() {
        let err = ClientError::Deserialization {
            endpoint: "POST /bank-api/verify".into(),
            reason: "expected value".into(),
        };
        assert!(!err.is_remote_rejection());
    }
}
