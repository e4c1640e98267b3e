/*
 * Responsibility
 * - Guard が返すエラー (AuthError / ValidationError) と、アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / `{ "message": ... }` body)
 * - 内部エラーはここでだけログに出し、クライアントには詳細を返さない
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Credential and token problems. The display text is the exact message sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Token required")]
    TokenRequired,
    #[error("Token invalid")]
    TokenInvalid,
    #[error("This is not for you")]
    Forbidden,
    // Same wording for every cause so responses do not reveal which usernames exist.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::TokenRequired | AuthError::TokenInvalid | AuthError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
        }
    }
}

/// Malformed client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Role name can not be admin")]
    ReservedRoleName,
    #[error("Role name can not be longer than 32 chars")]
    RoleNameTooLong,
}

impl ValidationError {
    pub fn status(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("repository failure")]
    Repo(#[from] RepoError),
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("failed to read request body")]
    Body(#[from] axum::Error),
    #[error("internal server error: {0}")]
    Internal(&'static str),
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(e) => e.status(),
            AppError::Validation(e) => e.status(),
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Repo(_) | AppError::Body(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Auth(e) => e.to_string(),
            AppError::Validation(e) => e.to_string(),
            AppError::NotFound { resource } => format!("{resource} not found"),
            AppError::PayloadTooLarge => "Request body too large".to_string(),
            AppError::Repo(_) | AppError::Body(_) | AppError::Internal(_) => {
                tracing::error!(error = ?self, "request failed with internal error");
                "internal server error".to_string()
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
