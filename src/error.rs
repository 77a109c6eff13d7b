/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - options / auth / config のエラーを統一的に変換
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::AuthContextError;
use crate::services::options::OptionsError;

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
    #[error("unauthorized: {scheme} credentials required")]
    Unauthorized { scheme: String },
    #[error("forbidden by {scheme} policy")]
    Forbidden { scheme: String },
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let challenge = match &self {
            AppError::Unauthorized { scheme } => HeaderValue::from_str(scheme).ok(),
            _ => None,
        };

        let (status, code) = match &self {
            AppError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(value) = challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
        response
    }
}

impl From<OptionsError> for AppError {
    fn from(e: OptionsError) -> Self {
        // 詳細はログのみ (レスポンスには出さない)
        tracing::error!(error = %e, "options resolution failed");
        AppError::Internal
    }
}

impl From<AuthContextError> for AppError {
    fn from(e: AuthContextError) -> Self {
        tracing::error!(error = %e, "invalid access decision");
        AppError::Internal
    }
}

impl From<ConfigError> for AppError {
    fn from(_: ConfigError) -> Self {
        AppError::Internal
    }
}
