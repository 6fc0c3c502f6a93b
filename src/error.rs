use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a body that is not valid JSON.
    #[error("Invalid response (status {status}): {snippet}")]
    InvalidResponse { status: u16, snippet: String },

    /// The server answered with a non-success status. The message is derived
    /// from the body by the gateway's priority rules.
    #[error("{message}")]
    RequestFailed {
        status: u16,
        message: String,
        body: Value,
    },

    /// Transport-level failure (DNS, refused connection, timeout). The
    /// underlying cause is deliberately discarded.
    #[error("Connection failed")]
    ConnectionFailed,

    #[error("No authenticated user")]
    NotAuthenticated,

    #[error("Validation error: {0}")]
    Validation(String),

    /// A 2xx body that does not decode into the type the endpoint promises.
    #[error("Unexpected response shape from {endpoint}: {detail}")]
    UnexpectedShape { endpoint: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status attached to this error, if the server got far enough to
    /// send one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::InvalidResponse { status, .. } => Some(*status),
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(s) if s >= 500)
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Config(err.to_string())
    }
}

// Every transport error collapses to ConnectionFailed; callers never see the
// reqwest-level cause.
impl From<reqwest::Error> for ApiError {
    fn from(_err: reqwest::Error) -> Self {
        ApiError::ConnectionFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = ApiError::RequestFailed {
            status: 404,
            message: "Not found.".to_string(),
            body: json!({"detail": "Not found."}),
        };
        assert_eq!(err.to_string(), "Not found.");

        let err = ApiError::Validation("invalid search query".to_string());
        assert_eq!(err.to_string(), "Validation error: invalid search query");

        let err = ApiError::ConnectionFailed;
        assert_eq!(err.to_string(), "Connection failed");
    }

    #[test]
    fn test_status_classification() {
        let err = ApiError::RequestFailed {
            status: 401,
            message: "Unauthorized".to_string(),
            body: json!({}),
        };
        assert!(err.is_unauthorized());
        assert!(!err.is_not_found());
        assert!(!err.is_server_error());

        let err = ApiError::RequestFailed {
            status: 503,
            message: "unavailable".to_string(),
            body: json!({}),
        };
        assert!(err.is_server_error());

        let err = ApiError::InvalidResponse {
            status: 200,
            snippet: "<html>".to_string(),
        };
        assert_eq!(err.status(), Some(200));

        assert_eq!(ApiError::NotAuthenticated.status(), None);
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = config::ConfigError::NotFound(String::from("key not found"));
        let err: ApiError = config_err.into();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
