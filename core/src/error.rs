use thiserror::Error;

/// Main error type for pretalx-rs
#[derive(Debug, Error)]
pub enum PretalxError {
    #[error("You need to pass (username AND password) OR token.")]
    MissingAuthParameter,

    /// Authentication response without a usable token. Carries the raw body.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

/// Result type alias using PretalxError
pub type Result<T> = std::result::Result<T, PretalxError>;
