// HTTP API Error Types
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message used when the backend answered with an error status but no usable `message`
pub const DEFAULT_SERVER_MESSAGE: &str = "An error occurred";

/// Message used for every failure that did not come back as an HTTP error response
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";

/// Failure of a single API call, normalized for display
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Transport failure, undecodable body, or anything else
    #[error("An unexpected error occurred")]
    Unexpected(#[source] BoxError),
}

impl ApiError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ApiError::Server {
            status,
            message: message.into(),
        }
    }

    pub fn unexpected(cause: impl Into<BoxError>) -> Self {
        ApiError::Unexpected(cause.into())
    }

    /// Build a server error from a raw error-status body.
    ///
    /// A JSON object with a string `message` is surfaced verbatim; any other
    /// body collapses to [`DEFAULT_SERVER_MESSAGE`].
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        let message = Self::message_in(body).unwrap_or_else(|| DEFAULT_SERVER_MESSAGE.to_string());
        ApiError::server(status, message)
    }

    /// Non-empty string `message` of a JSON object body, if there is one
    pub fn message_in(body: &[u8]) -> Option<String> {
        let value = serde_json::from_slice::<serde_json::Value>(body).ok()?;
        value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// HTTP status, when the backend produced one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Unexpected(_) => None,
        }
    }

    /// Client-facing message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Server { message, .. } => message,
            ApiError::Unexpected(_) => UNEXPECTED_MESSAGE,
        }
    }

    /// Error code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Server { .. } => "SERVER_ERROR",
            ApiError::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Unexpected(Box::new(err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
