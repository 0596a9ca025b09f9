use thiserror::Error;

/// Failure of a single outbound fetch.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("upstream body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl UpstreamError {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Status(_) => "status",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Decode(_) => "decode",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid user agent header: {0}")]
    InvalidUserAgent(#[from] reqwest::header::InvalidHeaderValue),
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Rejected query parameter in strict mode.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParamError {
    #[error("missing query parameter `{0}`")]
    Missing(&'static str),
    #[error("query parameter `{name}` must be a number, got `{value}`")]
    NotANumber { name: &'static str, value: String },
    #[error("query parameter `{name}` must be between -{limit} and {limit}, got `{value}`")]
    OutOfRange {
        name: &'static str,
        value: String,
        limit: f64,
    },
    #[error("query parameter `{0}` must not be empty")]
    Empty(&'static str),
}
