use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::{auth::AuthError, suggest::GenerationError, users::UserError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Profile not found")]
    ProfileNotFound,

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    /// Wraps a generation failure, carrying provider detail into the
    /// response only when the deployment opts in. The detail is logged
    /// either way.
    pub fn generation(err: GenerationError, expose_detail: bool) -> Self {
        match err {
            GenerationError::ProviderFailure(detail) => {
                warn!("Text generation failed: {detail}");
                if expose_detail {
                    AppError::Generation(GenerationError::ProviderFailure(detail))
                } else {
                    AppError::Generation(GenerationError::ProviderFailure(
                        "provider request failed".to_string(),
                    ))
                }
            }
            other => AppError::Generation(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Auth(AuthError::MissingToken) => StatusCode::UNAUTHORIZED,
            AppError::Auth(AuthError::InvalidToken) => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::MissingField { .. } => StatusCode::BAD_REQUEST,
            AppError::ProfileNotFound => StatusCode::NOT_FOUND,
            AppError::User(UserError::EmailTaken) => StatusCode::CONFLICT,
            AppError::Generation { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (AppError::Auth(AuthError::MissingToken), 401),
            (AppError::Auth(AuthError::InvalidToken), 403),
            (AppError::InvalidCredentials, 401),
            (AppError::MissingField("email"), 400),
            (AppError::ProfileNotFound, 404),
            (AppError::User(UserError::EmailTaken), 409),
            (
                AppError::Generation(GenerationError::EmptyResponse),
                500,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status().as_u16(), expected);
        }
    }

    #[test]
    fn provider_detail_suppressed_by_default() {
        let err = AppError::generation(
            GenerationError::ProviderFailure("upstream 429".to_string()),
            false,
        );
        assert!(!err.to_string().contains("429"));

        let err = AppError::generation(
            GenerationError::ProviderFailure("upstream 429".to_string()),
            true,
        );
        assert!(err.to_string().contains("429"));
    }
}
