#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use carlead::notifications::NotificationDispatcher;
use carlead::services::auth_service::AdminAuth;
use carlead::store::SubmissionStore;
use carlead::web::create_axum_router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "correct horse";
pub const JWT_SECRET: &str = "integration-secret";

pub fn admin_auth() -> Arc<AdminAuth> {
    Arc::new(AdminAuth::with_cost(Some(ADMIN_PASSWORD), JWT_SECRET, 60, 4).expect("admin auth"))
}

pub fn app(store: Arc<dyn SubmissionStore>, notifier: NotificationDispatcher) -> Router {
    create_axum_router(store, notifier, admin_auth())
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response: Response<Body> = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize")))
        .expect("request")
}

pub fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        post_json("/api/admin/auth", &serde_json::json!({ "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token").to_string()
}

pub async fn list(app: &Router, token: &str) -> Vec<Value> {
    let (status, body) = send(app, get_with_token("/api/admin/submissions", Some(token))).await;
    assert_eq!(status, StatusCode::OK, "listing failed: {body}");
    body["submissions"].as_array().expect("submissions array").clone()
}
