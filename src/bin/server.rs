use carlead::notifications::NotificationDispatcher;
use carlead::notifications::senders::NotificationSender;
use carlead::notifications::senders::telegram::{TelegramConfig, TelegramSender};
use carlead::server::config::ServerConfig;
use carlead::services::auth_service::AdminAuth;
use carlead::store::{JsonFileStore, SubmissionStore};
use carlead::web::create_axum_router;

use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(log_dir: &str) -> WorkerGuard {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "server.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}

fn build_notification_sender(config: &ServerConfig) -> Option<Arc<dyn NotificationSender>> {
    let telegram_config = TelegramConfig::from_credentials(
        config.telegram_bot_token.as_deref(),
        config.telegram_chat_id.as_deref(),
        &config.telegram_api_base,
        config.notification_timeout(),
    )?;

    match TelegramSender::new(telegram_config) {
        Ok(sender) => Some(Arc::new(sender)),
        Err(e) => {
            error!(error = %e, "Failed to build Telegram sender; notifications disabled.");
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C.");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining in-flight requests.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // --- Server Config Setup ---
    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    let _log_guard = init_logging(&server_config.log_dir);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting lead capture server.");

    // --- Submission Store Setup ---
    let submissions_path = server_config.submissions_path();
    info!(path = ?submissions_path, "Using JSON file submission store.");
    let store: Arc<dyn SubmissionStore> = Arc::new(JsonFileStore::new(submissions_path));

    // --- Notification Setup ---
    let sender = build_notification_sender(&server_config);
    let (notifier, notification_worker) = NotificationDispatcher::start(
        sender,
        server_config.notification_queue_capacity,
        server_config.notification_drain_deadline(),
    );

    // --- Admin Gate Setup ---
    let admin_auth = Arc::new(AdminAuth::new(
        server_config.admin_password.as_deref(),
        &server_config.jwt_secret,
        server_config.session_ttl_minutes,
    )?);
    if !admin_auth.is_enabled() {
        warn!("Admin listing is unreachable until ADMIN_PASSWORD is configured.");
    }

    let app = create_axum_router(store, notifier, admin_auth);

    let listener = TcpListener::bind(&server_config.bind_addr).await?;
    info!(addr = %server_config.bind_addr, "HTTP server listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router is gone, so the queue is closed; let pending sends finish.
    if let Some(worker) = notification_worker {
        if let Err(e) = worker.await {
            error!(error = %e, "Notification worker terminated abnormally.");
        }
    }

    info!("Server stopped.");
    Ok(())
}
