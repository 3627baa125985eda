//! Error handling

use axum::{
    extract::rejection::QueryRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::dataset::DatasetError;
use crate::scoring::ScoringError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Remote API errors
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Feature vector has {actual} values but the model expects {expected}")]
    SchemaMismatch { expected: usize, actual: usize },

    // Dataset errors
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    // Validation errors
    #[error("{0}")]
    Validation(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Scoring(ScoringError::Connectivity(_)) => StatusCode::BAD_GATEWAY,
            AppError::Scoring(ScoringError::BadResponse { .. }) => StatusCode::BAD_GATEWAY,
            AppError::Scoring(ScoringError::Decode(_)) => StatusCode::BAD_GATEWAY,
            AppError::SchemaMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Dataset(DatasetError::MissingRecord(_)) => StatusCode::NOT_FOUND,
            AppError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Dataset(DatasetError::MissingRecord(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Scoring(ScoringError::BadResponse { status: 500, body: "boom".into() }).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(AppError::Validation("bad".into()).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_response_message_carries_status_and_body() {
        let err = AppError::from(ScoringError::BadResponse {
            status: 422,
            body: "features: wrong length".into(),
        });
        assert_eq!(err.to_string(), "Scoring API error: 422 - features: wrong length");
    }
}
