use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::services::RecommenderError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Recommender(#[from] RecommenderError),

    /// Provider failure already logged; only the user-facing text remains
    #[error("{0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Recommender(RecommenderError::MissingCredential { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Recommender(_) | AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = AppError::SessionNotFound(Uuid::nil()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let missing_key = AppError::from(RecommenderError::MissingCredential {
            var: "GEMINI_API_KEY",
        })
        .into_response();
        assert_eq!(missing_key.status(), StatusCode::SERVICE_UNAVAILABLE);

        let upstream =
            AppError::from(RecommenderError::GameSearch("timeout".to_string())).into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let hidden = AppError::Upstream("Game not found or API error.".to_string());
        assert_eq!(hidden.to_string(), "Game not found or API error.");
        assert_eq!(hidden.into_response().status(), StatusCode::BAD_GATEWAY);

        let internal = AppError::Internal("task panicked".to_string()).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
