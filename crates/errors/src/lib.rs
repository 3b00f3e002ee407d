use thiserror::Error;

/// Construction-time faults.
///
/// Expected runtime conditions (transport failures, unknown feature ids,
/// role violations) never surface through this type; they are carried by
/// `CallResult` / `OrchestrationResult` values instead. `GalaxyError` is
/// reserved for programming and configuration errors such as a malformed
/// registry or an unparseable config file.
#[derive(Debug, Error)]
pub enum GalaxyError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type GalaxyResult<T> = Result<T, GalaxyError>;

impl GalaxyError {
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<serde_json::Error> for GalaxyError {
    fn from(err: serde_json::Error) -> Self {
        GalaxyError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for GalaxyError {
    fn from(err: anyhow::Error) -> Self {
        GalaxyError::Internal(err.to_string())
    }
}
