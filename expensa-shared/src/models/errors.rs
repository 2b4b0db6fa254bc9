use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-2xx responses.
///
/// Backends vary in which fields they fill, so all of them are optional on the
/// wire and [`ErrorResponse::parse`] never fails.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// The main error message
    #[serde(default)]
    pub message: String,
    /// Optional additional details about the error
    #[serde(default)]
    pub details: Option<String>,
    /// Short reason phrase some endpoints add (e.g. `Forbidden`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Creates a new error response with message and details.
    pub fn with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Some(details.into()),
            error: None,
        }
    }

    /// Parses a response body, returning `None` for empty, non-JSON or
    /// message-less bodies.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        let parsed: Self = serde_json::from_str(body.trim()).ok()?;
        if parsed.message.is_empty() && parsed.error.is_none() {
            None
        } else {
            Some(parsed)
        }
    }

    /// Checks if this error response has details.
    pub const fn has_details(&self) -> bool {
        self.details.is_some()
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = if self.message.is_empty() {
            self.error.as_deref().unwrap_or_default()
        } else {
            self.message.as_str()
        };
        match &self.details {
            Some(details) => write!(f, "{message}: {details}"),
            None => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ErrorResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test ErrorResponse creation with new()
    #[test]
    fn test_error_response_new() {
        let error = ErrorResponse::new("Test error");
        assert_eq!(error.message, "Test error");
        assert_eq!(error.details, None);
        assert!(!error.has_details());
    }

    /// Test ErrorResponse Display implementation
    #[test]
    fn test_error_response_display() {
        assert_eq!(ErrorResponse::new("Simple error").to_string(), "Simple error");
        assert_eq!(
            ErrorResponse::with_details("Main error", "Additional info").to_string(),
            "Main error: Additional info"
        );
        let reason_only = ErrorResponse {
            error: Some("Forbidden".into()),
            ..ErrorResponse::default()
        };
        assert_eq!(reason_only.to_string(), "Forbidden");
    }

    #[test]
    fn parse_is_lenient() {
        assert_eq!(
            ErrorResponse::parse(r#"{"message":"Expense not found"}"#),
            Some(ErrorResponse::new("Expense not found"))
        );
        assert!(ErrorResponse::parse("").is_none());
        assert!(ErrorResponse::parse("<html>Bad Gateway</html>").is_none());
        assert!(ErrorResponse::parse(r#"{"timestamp":"2025-01-01"}"#).is_none());
        assert!(
            ErrorResponse::parse(r#"{"status":403,"error":"Forbidden"}"#)
                .is_some_and(|body| body.error.as_deref() == Some("Forbidden"))
        );
    }
}
