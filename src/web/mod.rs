use axum::{Router, http::Method, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::notifications::NotificationDispatcher;
use crate::services::auth_service::AdminAuth;
use crate::store::SubmissionStore;
use crate::web::routes::{admin_routes, submission_routes};

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub notifier: NotificationDispatcher,
    pub admin_auth: Arc<AdminAuth>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(
    store: Arc<dyn SubmissionStore>,
    notifier: NotificationDispatcher,
    admin_auth: Arc<AdminAuth>,
) -> Router {
    let app_state = Arc::new(AppState {
        store,
        notifier,
        admin_auth,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .merge(submission_routes::create_submission_router())
        .nest("/api/admin", admin_routes::create_admin_router(app_state.clone()))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
