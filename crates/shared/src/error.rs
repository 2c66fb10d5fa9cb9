use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a failed contact submission, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitFailure {
    /// The request never produced a response (unreachable host, aborted
    /// connection, DNS, TLS).
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("{message}")]
    HttpStatus { status: u16, message: String },
    /// The request body could not be encoded.
    #[error("payload encoding failed: {0}")]
    ParseFailure(String),
}

impl SubmitFailure {
    pub fn http_status(status: u16, message: Option<String>) -> Self {
        Self::HttpStatus {
            status,
            message: message.unwrap_or_else(|| format!("HTTP Error: {status}")),
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::HttpStatus { status, .. } if (500..600).contains(status))
    }
}

/// Error document returned by the data store on non-2xx responses. Only
/// `message` is read; other members (`code`, `details`, `hint`) vary in type
/// between stores and are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_defaults_message_to_status_code() {
        let failure = SubmitFailure::http_status(502, None);
        assert_eq!(failure.to_string(), "HTTP Error: 502");
        assert!(failure.is_server_error());
    }

    #[test]
    fn client_errors_are_not_server_errors() {
        let failure = SubmitFailure::http_status(409, Some("duplicate key".into()));
        assert_eq!(failure.to_string(), "duplicate key");
        assert!(!failure.is_server_error());
        assert!(!SubmitFailure::NetworkFailure("refused".into()).is_server_error());
    }

    #[test]
    fn error_body_message_survives_numeric_code() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"code":401,"message":"Invalid API key","details":null}"#)
                .expect("decode");
        assert_eq!(body.message.as_deref(), Some("Invalid API key"));
    }
}
