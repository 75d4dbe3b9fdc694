use reqwest::StatusCode;
use serde_json::Value;

/// Error type shared by the client library and the terminal front-end.
///
/// The first six variants are the failure kinds the request layer produces;
/// callers branch on the variant, never on message text.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Request timeout. Please check your connection.")]
    Timeout,
    #[error("Session expired. Please log in again.")]
    Unauthorized,
    #[error("Cannot reach the backend: {0}. Please verify the server is running.")]
    BackendUnreachable(String),
    /// HTTP succeeded but the response envelope signalled a logical failure.
    #[error("{message}")]
    Business {
        code: Option<i64>,
        message: String,
        /// Raw envelope, kept for diagnostics.
        envelope: Value,
    },
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
    /// Non-2xx HTTP status with whatever message could be extracted.
    #[error("API returned an error: status={status}, message={message}")]
    Api { status: StatusCode, message: String },

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Internal client error: {0}")]
    Internal(String),
}

impl CliError {
    /// True for failures the user can usually fix by checking connectivity.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Timeout | Self::BackendUnreachable(_))
    }
}
