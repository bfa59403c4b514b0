//! Error handling for lapsecam

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Camera unreachable at session start (fatal, ends the run)
    #[error("Camera unreachable: {0}")]
    Unreachable(String),

    /// Capture request failed (transport, status, or payload decode)
    #[error("Capture failed: {0}")]
    Capture(String),

    /// Device rejected a control setting
    #[error("Control setting failed: {0}")]
    Control(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
