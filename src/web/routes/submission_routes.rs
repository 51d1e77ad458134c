use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use std::sync::Arc;
use tracing::debug;

use crate::services::submission_service;
use crate::web::{
    AppState,
    error::{AppError, MSG_MISSING_FIELDS},
    models::{SubmissionRequest, SubmissionResponse},
};

pub const MSG_SUBMITTED: &str = "신청이 완료되었습니다";

pub fn create_submission_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/submit", post(submit_handler))
}

async fn submit_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected malformed submission body.");
        AppError::InvalidInput(MSG_MISSING_FIELDS.to_string())
    })?;

    let record = submission_service::accept_submission(
        app_state.store.as_ref(),
        &app_state.notifier,
        payload,
    )
    .await?;

    Ok(Json(SubmissionResponse {
        success: true,
        message: MSG_SUBMITTED.to_string(),
        data: Some(record),
    }))
}
