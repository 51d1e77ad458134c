use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

pub const MSG_MISSING_FIELDS: &str = "모든 필드를 입력해주세요";
pub const MSG_SERVER_ERROR: &str = "서버 오류가 발생했습니다";
pub const MSG_WRONG_PASSWORD: &str = "비밀번호가 올바르지 않습니다";
pub const MSG_LOGIN_REQUIRED: &str = "관리자 로그인이 필요합니다";
pub const MSG_PASSWORD_REQUIRED: &str = "비밀번호를 입력해주세요";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("JWT creation failed: {0}")]
    TokenCreationError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, MSG_WRONG_PASSWORD.to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Storage(e) => {
                error!(error = %e, "Submission store failure.");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_SERVER_ERROR.to_string())
            }
            AppError::TokenCreationError(msg) | AppError::InternalServerError(msg) => {
                error!(error = %msg, "Internal error while handling request.");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_SERVER_ERROR.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}
