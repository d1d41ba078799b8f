//! HTTP error responses. Every failure renders `{error, details}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;

use crate::error::BoardError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                details: details.into(),
            },
        }
    }

    /// Wrap a crate error: request problems are 400, everything else 500
    pub fn from_board(context: &str, err: BoardError) -> Self {
        if err.is_client_error() {
            Self::new(StatusCode::BAD_REQUEST, "Invalid request", err.to_string())
        } else {
            error!("{}: {}", context, err);
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, context, err.to_string())
        }
    }

    pub fn missing(parameter: &str) -> Self {
        Self::from_board("Invalid request", BoardError::MissingParameter(parameter.to_string()))
    }

    /// A newer precompute for the same session started while this one ran
    pub fn superseded(session: &str) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "Superseded",
            format!("a newer board precomputation started for session '{}'", session),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::missing("label").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from_board("Failed", BoardError::upstream("503")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::superseded("s").status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_missing_parameter_details() {
        let err = ApiError::missing("playerQ");
        assert_eq!(err.body.details, "playerQ parameter is required");
    }
}
