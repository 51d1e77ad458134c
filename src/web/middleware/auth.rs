use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::web::AppState;
use crate::web::error::{AppError, MSG_LOGIN_REQUIRED};

pub const ADMIN_COOKIE: &str = "admin_token";

pub async fn admin_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    // Try to get token from Authorization header first, then fall back to cookie
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .or_else(|| jar.get(ADMIN_COOKIE).map(|c| c.value().to_string()))
        .ok_or_else(|| AppError::Unauthorized(MSG_LOGIN_REQUIRED.to_string()))?;

    let session = state.admin_auth.validate_token(&token)?;
    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
