use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollrunError {
    #[error("request '{0}' not found in collection")]
    RequestNotFound(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("response body is not valid JSON: {0}")]
    DecodeError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl CollrunError {
    /// Errors raised while turning a template into a concrete request.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            CollrunError::InvalidUrl(_)
                | CollrunError::InvalidMethod(_)
                | CollrunError::InvalidHeader { .. }
        )
    }

    /// Errors raised by the exchange itself.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            CollrunError::HttpError(_) | CollrunError::NetworkError(_)
        )
    }
}

impl From<anyhow::Error> for CollrunError {
    fn from(err: anyhow::Error) -> Self {
        CollrunError::Other(err.to_string())
    }
}

/// Result type for collrun crate
pub type Result<T> = std::result::Result<T, CollrunError>;
