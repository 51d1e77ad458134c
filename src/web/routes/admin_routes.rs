use axum::{
    Json, Router,
    extract::{Extension, State, rejection::JsonRejection},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::services::submission_service;
use crate::web::{
    AppState,
    error::{AppError, MSG_PASSWORD_REQUIRED},
    middleware::auth::{ADMIN_COOKIE, admin_auth},
    models::{AdminLoginRequest, AdminSession, AdminSessionResponse, SubmissionListResponse},
};

/// `/auth` and `/logout` are public; everything else requires an admin session.
pub fn create_admin_router(app_state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/session", get(session_handler))
        .route("/submissions", get(list_submissions_handler))
        .route_layer(axum_middleware::from_fn_with_state(app_state, admin_auth));

    Router::new()
        .route("/auth", post(login_handler))
        .route("/logout", post(logout_handler))
        .merge(protected)
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected malformed login body.");
        AppError::InvalidInput(MSG_PASSWORD_REQUIRED.to_string())
    })?;

    let login_response = app_state.admin_auth.login(&payload.password)?;
    info!(expires_at = %login_response.expires_at, "Admin session issued.");

    let max_age = time_duration(app_state.admin_auth.session_ttl());
    let auth_cookie = Cookie::build((ADMIN_COOKIE, login_response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build();

    Ok((jar.add(auth_cookie), Json(login_response)))
}

/// Expires the session cookie. Stateless tokens stay valid until `exp`, so a
/// copied bearer token is not revoked by this.
async fn logout_handler(jar: CookieJar) -> impl IntoResponse {
    info!("Admin session cookie cleared.");
    let removal = Cookie::build(ADMIN_COOKIE).path("/").build();
    (jar.remove(removal), Json(json!({ "success": true })))
}

fn time_duration(ttl: chrono::Duration) -> time::Duration {
    time::Duration::seconds(ttl.num_seconds())
}

async fn session_handler(
    Extension(session): Extension<AdminSession>,
) -> Json<AdminSessionResponse> {
    Json(AdminSessionResponse {
        authenticated: true,
        expires_at: session.expires_at,
    })
}

async fn list_submissions_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<SubmissionListResponse>, AppError> {
    let submissions = submission_service::list_submissions(app_state.store.as_ref()).await?;
    Ok(Json(SubmissionListResponse { submissions }))
}
