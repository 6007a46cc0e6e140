use reqwest::StatusCode;
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;

use crate::http::Retryable;

/// Everything that can go wrong talking to the banking service.
///
/// The first group are preconditions: the request was never sent. The
/// second group means a request went out and did not produce a usable answer.
#[derive(Error, Debug)]
pub enum BankingError {
    #[error("Invalid amount: {0}. Amount must be positive")]
    InvalidAmount(Decimal),

    #[error("Account id must not be empty")]
    EmptyAccountId,

    #[error("Account {0} validation failed")]
    AccountValidation(String),

    #[error("Authentication required: call authenticate first")]
    NotAuthenticated,

    #[error("Client session is closed")]
    SessionClosed,

    #[error("Invalid API URL {0:?}: expected an absolute http or https URL")]
    InvalidUrl(String),

    #[error("Request could not be built: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    #[error("Request timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response is missing field `{0}`")]
    MissingField(&'static str),

    #[error("Authentication response missing token")]
    MissingToken,

    #[error("Failed to build HTTP client: {0}")]
    Setup(#[source] reqwest::Error),
}

impl BankingError {
    /// True when the operation was rejected locally and nothing was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            BankingError::InvalidAmount(_)
                | BankingError::EmptyAccountId
                | BankingError::AccountValidation(_)
                | BankingError::NotAuthenticated
                | BankingError::SessionClosed
                | BankingError::InvalidUrl(_)
                | BankingError::InvalidRequest(_)
        )
    }

    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BankingError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Retryable for BankingError {
    /// Only transport-level failures are worth repeating; an HTTP error
    /// status is the server's answer and is handled by the operation itself.
    fn is_retryable(&self) -> bool {
        matches!(self, BankingError::Timeout(_) | BankingError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_errors() {
        assert!(BankingError::InvalidAmount(Decimal::ZERO).is_precondition());
        assert!(BankingError::EmptyAccountId.is_precondition());
        assert!(BankingError::AccountValidation("ACC1".to_string()).is_precondition());
        assert!(BankingError::NotAuthenticated.is_precondition());
        assert!(BankingError::SessionClosed.is_precondition());
        assert!(BankingError::InvalidUrl("localhost:8123".to_string()).is_precondition());

        assert!(!BankingError::MissingToken.is_precondition());
        assert!(!BankingError::Timeout(Duration::from_secs(1)).is_precondition());
    }

    #[test]
    fn test_http_errors_are_not_retryable() {
        let err = BankingError::Http {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));

        assert!(BankingError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(!BankingError::NotAuthenticated.is_retryable());
        assert!(!BankingError::MissingField("balance").is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = BankingError::InvalidAmount(Decimal::new(-5, 0));
        assert_eq!(err.to_string(), "Invalid amount: -5. Amount must be positive");

        let err = BankingError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Request timed out after 30 seconds");

        let err = BankingError::Http {
            status: StatusCode::BAD_REQUEST,
            body: "nope".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 400 Bad Request: nope");
    }

    #[tokio::test]
    async fn test_connection_refused_is_retryable() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .unwrap_err();

        assert!(BankingError::Transport(err).is_retryable());
    }

    #[tokio::test]
    async fn test_unbuildable_request_is_not_retryable() {
        let err = reqwest::Client::new()
            .get("localhost:8123/transfer")
            .send()
            .await
            .unwrap_err();
        assert!(err.is_builder());

        let err = BankingError::InvalidRequest(err);
        assert!(err.is_precondition());
        assert!(!err.is_retryable());
        assert!(!BankingError::InvalidUrl(String::new()).is_retryable());
    }
}
