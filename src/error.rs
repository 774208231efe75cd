//! Error types for the prediction service

use thiserror::Error;

/// Service-wide result alias
pub type Result<T> = std::result::Result<T, SicboError>;

#[derive(Error, Debug)]
pub enum SicboError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(String),

    /// Round history could not be obtained or was malformed
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

impl SicboError {
    /// Collapse any upstream acquisition failure into `DataUnavailable`
    pub fn into_unavailable(self) -> Self {
        match self {
            SicboError::DataUnavailable(_) => self,
            other => SicboError::DataUnavailable(other.to_string()),
        }
    }
}
