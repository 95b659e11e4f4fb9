/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / body)
 * - path 拒否・認証・認可の失敗は plain text、それ以外は JSON error body
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    // dot segments, `//`, encoded separators: never matched against the allow-list
    #[error("Request rejected")]
    RejectedPath,
    // Authorization header absent, not UTF-8, or without the `Bearer ` prefix
    #[error("Authorization header missing or invalid")]
    MissingCredentials,
    #[error("Invalid or expired JWT token")]
    InvalidToken,
    #[error("Access denied")]
    Forbidden,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RejectedPath => StatusCode::BAD_REQUEST,
            AppError::MissingCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (code, message) = match self {
            AppError::RejectedPath
            | AppError::MissingCredentials
            | AppError::InvalidToken
            | AppError::Forbidden => {
                return (status, self.to_string()).into_response();
            }
            AppError::NotFound { resource } => ("not_found", format!("{resource} not found.")),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}
