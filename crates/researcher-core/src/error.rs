//! Submission failure types

use thiserror::Error;

/// Why a submission produced no answer.
///
/// Every variant reaches the user through the same `Failed to get response`
/// message; the tag only feeds logging.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// Connection refused, DNS failure, reset, or any other transport error
    #[error("{0}")]
    Network(String),
    /// The service answered with a non-2xx status
    #[error("Request failed with status code {status}{}", detail_suffix(.detail))]
    HttpStatus { status: u16, detail: Option<String> },
    /// The body was not a JSON object
    #[error("Invalid response body: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {}", detail),
        None => String::new(),
    }
}

impl SubmissionError {
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionError::Network(_) => "network",
            SubmissionError::HttpStatus { .. } => "http_status",
            SubmissionError::Decode(_) => "decode",
        }
    }

    /// Message placed in the error payload shown to the user
    pub fn user_message(&self) -> String {
        format!("Failed to get response: {}", self)
    }
}

impl From<reqwest::Error> for SubmissionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SubmissionError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SubmissionError::HttpStatus {
                status: status.as_u16(),
                detail: None,
            }
        } else {
            SubmissionError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SubmissionError {
    fn from(err: serde_json::Error) -> Self {
        SubmissionError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_message_is_verbatim() {
        let err = SubmissionError::Network("Network Error".to_string());
        assert_eq!(err.user_message(), "Failed to get response: Network Error");
        assert_eq!(err.kind(), "network");
    }

    #[test]
    fn test_status_message_with_and_without_detail() {
        let bare = SubmissionError::HttpStatus {
            status: 500,
            detail: None,
        };
        assert_eq!(bare.to_string(), "Request failed with status code 500");

        let detailed = SubmissionError::HttpStatus {
            status: 400,
            detail: Some("Question cannot be empty".to_string()),
        };
        assert_eq!(
            detailed.user_message(),
            "Failed to get response: Request failed with status code 400: Question cannot be empty"
        );
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let err: SubmissionError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), "decode");
        assert!(err.to_string().starts_with("Invalid response body: "));
    }
}
