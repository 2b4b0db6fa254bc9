use reqwest::StatusCode;
use shared::models::ErrorResponse;
use thiserror::Error;

use crate::storage::StorageError;

/// Failure of a backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response arrived (network failure, timeout, aborted fetch).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The backend answered with a non-2xx status.
    #[error("{}", status_message(.status, .body))]
    Status {
        status: StatusCode,
        body: Option<ErrorResponse>,
    },
    /// A 2xx body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn status_message(status: &StatusCode, body: &Option<ErrorResponse>) -> String {
    match body {
        Some(body) if !body.message.is_empty() => {
            format!("server responded with {status}: {}", body.message)
        }
        _ => format!("server responded with {status}"),
    }
}

impl ApiError {
    /// HTTP status of the failing response, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// The credential was missing, expired or rejected.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }

    /// Parsed backend error body, when the response carried one.
    #[must_use]
    pub fn body(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Short sentence suitable for a toast or a terminal.
    #[must_use]
    pub fn user_message(&self) -> String {
        if let Some(body) = self.body().filter(|body| !body.message.is_empty()) {
            return body.message.clone();
        }
        match self {
            Self::Status { status, .. } => match *status {
                StatusCode::UNAUTHORIZED => "Your session has expired. Please sign in again.".into(),
                StatusCode::FORBIDDEN => "You are not allowed to do that.".into(),
                StatusCode::NOT_FOUND => "The requested item no longer exists.".into(),
                status if status.is_server_error() => {
                    "The server ran into a problem. Please try again later.".into()
                }
                status => format!("Request failed ({status})."),
            },
            Self::Transport(_) => "Could not reach the server. Check your connection.".into(),
            Self::Decode(_) => "The server sent a response we could not read.".into(),
            Self::InvalidRequest(message) => message.clone(),
            Self::Storage(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: StatusCode, body: Option<ErrorResponse>) -> ApiError {
        ApiError::Status { status: code, body }
    }

    #[test]
    fn only_unauthorized_is_an_auth_failure() {
        assert!(status(StatusCode::UNAUTHORIZED, None).is_auth_failure());
        let forbidden = status(StatusCode::FORBIDDEN, None);
        assert!(!forbidden.is_auth_failure());
        assert!(forbidden.is_forbidden());
        assert!(!ApiError::Decode("x".into()).is_auth_failure());
    }

    #[test]
    fn backend_message_wins() {
        let err = status(
            StatusCode::BAD_REQUEST,
            Some(ErrorResponse::new("Amount must be positive")),
        );
        assert_eq!(err.user_message(), "Amount must be positive");
        assert_eq!(
            err.to_string(),
            "server responded with 400 Bad Request: Amount must be positive"
        );
    }

    #[test]
    fn fallback_messages_depend_on_status() {
        assert!(
            status(StatusCode::INTERNAL_SERVER_ERROR, None)
                .user_message()
                .contains("try again")
        );
        assert!(
            status(StatusCode::UNAUTHORIZED, None)
                .user_message()
                .contains("sign in")
        );
        assert_eq!(
            status(StatusCode::INTERNAL_SERVER_ERROR, None).to_string(),
            "server responded with 500 Internal Server Error"
        );
    }
}
