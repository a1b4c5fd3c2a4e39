use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum RiskError {
    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A JSON payload could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading an input file or model artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The news provider rejected the API key (HTTP 401).
    #[error("news provider rejected the API key")]
    Unauthorized,

    /// The news provider throttled the request (HTTP 429).
    #[error("news provider rate limit exceeded")]
    RateLimited,

    /// An operation did not finish within its deadline.
    #[error("operation timed out")]
    Timeout,

    /// The data received was in an unexpected format or was missing a required field.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// The prediction request itself is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The base classifier could not be loaded.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The base classifier failed while producing a prediction.
    #[error("model failure: {0}")]
    Model(String),
}

impl From<tokio::time::error::Elapsed> for RiskError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        RiskError::Timeout
    }
}
