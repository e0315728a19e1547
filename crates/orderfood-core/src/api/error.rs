use serde::Deserialize;
use thiserror::Error;

/// Failure of a single API call.
///
/// Every non-2xx response is mapped onto one of these variants at the
/// transport boundary, carrying the backend's `{"error": "..."}` message
/// when it sent one. Callers use [`ApiError::server_message`] or
/// [`ApiError::user_message`] instead of looking at response bodies.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized{}", detail(.0))]
    Unauthorized(Option<String>),

    #[error("Access denied{}", detail(.0))]
    AccessDenied(Option<String>),

    #[error("Resource not found{}", detail(.0))]
    NotFound(Option<String>),

    #[error("Request rejected (status {status}){}", detail(.message))]
    Rejected { status: u16, message: Option<String> },

    #[error("Server error{}", detail(.0))]
    ServerError(Option<String>),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}

/// Maximum length for error response bodies in log output
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = body
                .char_indices()
                .take_while(|(i, _)| *i < MAX_ERROR_BODY_LENGTH)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    /// Pull the `error` string out of a JSON error body, if there is one.
    fn extract_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|b| b.error)
            .filter(|m| !m.trim().is_empty())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::ServerError(message),
            code => ApiError::Rejected { status: code, message },
        }
    }

    /// The message the backend sent with the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(m)
            | ApiError::AccessDenied(m)
            | ApiError::NotFound(m)
            | ApiError::ServerError(m)
            | ApiError::Rejected { message: m, .. } => m.as_deref(),
            ApiError::NetworkError(_) | ApiError::InvalidResponse(_) => None,
        }
    }

    /// Text for a notification: the server's message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// Missing or expired token on a protected endpoint.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::AccessDenied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_extracts_message() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error":"Invalid credentials"}"#);
        assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert_eq!(err.user_message("Login failed."), "Invalid credentials");
    }

    #[test]
    fn test_from_status_without_message() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert!(matches!(err, ApiError::ServerError(None)));
        assert_eq!(err.user_message("Checkout failed."), "Checkout failed.");

        let blank = ApiError::from_status(StatusCode::CONFLICT, r#"{"error":"  "}"#);
        assert_eq!(blank.server_message(), None);
    }

    #[test]
    fn test_status_mapping() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(ApiError::from_status(StatusCode::FORBIDDEN, "").is_unauthorized());
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(None)
        ));
        assert!(!ApiError::from_status(StatusCode::CONFLICT, "").is_unauthorized());
    }

    #[test]
    fn test_display() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"error":"Token expired"}"#);
        assert_eq!(err.to_string(), "Unauthorized: Token expired");
        let err = ApiError::Rejected { status: 409, message: None };
        assert_eq!(err.to_string(), "Request rejected (status 409)");
    }

    #[test]
    fn test_truncate_body() {
        let short = "short body";
        assert_eq!(ApiError::truncate_body(short), short);
        let long = "x".repeat(600);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
    }
}
