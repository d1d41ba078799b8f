//! Error types for board generation and answer validation
//!
//! Upstream failures are usually caught at the point of use and degraded to
//! empty results; only the HTTP layer and a few direct lookups surface them.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Wikidata query failed: {message}")]
    UpstreamQuery { message: String },

    #[error("{0} parameter is required")]
    MissingParameter(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Athlete database unavailable at {path}: {reason}")]
    DatabaseUnavailable { path: PathBuf, reason: String },
}

impl BoardError {
    pub fn upstream(message: impl Into<String>) -> Self {
        BoardError::UpstreamQuery {
            message: message.into(),
        }
    }

    /// True for failures a client can fix by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BoardError::MissingParameter(_) | BoardError::InvalidParameter(_)
        )
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            BoardError::upstream(format!("request timed out: {}", error))
        } else {
            BoardError::upstream(error.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(BoardError::MissingParameter("label".into()).is_client_error());
        assert!(BoardError::InvalidParameter("type".into()).is_client_error());
        assert!(!BoardError::upstream("boom").is_client_error());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            BoardError::MissingParameter("playerQ".into()).to_string(),
            "playerQ parameter is required"
        );
        assert_eq!(
            BoardError::upstream("503 Service Unavailable").to_string(),
            "Wikidata query failed: 503 Service Unavailable"
        );
    }
}
