//! Intake must succeed no matter what happens to the staff notification.

mod common;

use axum::http::StatusCode;
use carlead::notifications::NotificationDispatcher;
use carlead::notifications::senders::NotificationSender;
use carlead::notifications::senders::telegram::{TelegramConfig, TelegramSender};
use carlead::store::{MemoryStore, SubmissionStore};
use common::*;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const DRAIN_DEADLINE: Duration = Duration::from_secs(5);

fn start_telegram(
    server: &MockServer,
    timeout: Duration,
) -> (NotificationDispatcher, Option<JoinHandle<()>>) {
    let config = TelegramConfig::from_credentials(Some("42:token"), Some("-100"), &server.uri(), timeout)
        .expect("telegram config");
    let sender: Arc<dyn NotificationSender> = Arc::new(TelegramSender::new(config).expect("sender"));
    NotificationDispatcher::start(Some(sender), 16, DRAIN_DEADLINE)
}

fn telegram_dispatcher(server: &MockServer, timeout: Duration) -> NotificationDispatcher {
    start_telegram(server, timeout).0
}

fn submission() -> serde_json::Value {
    json!({
        "carNumber": "12가3456",
        "carModel": "현대 그랜저 2020",
        "phoneNumber": "010-1234-5678"
    })
}

async fn wait_for_requests(server: &MockServer, expected: usize) -> Vec<wiremock::Request> {
    for _ in 0..50 {
        let requests = server.received_requests().await.unwrap_or_default();
        if requests.len() >= expected {
            return requests;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    server.received_requests().await.unwrap_or_default()
}

#[tokio::test]
async fn successful_notification_carries_the_lead() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot42:token/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone(), telegram_dispatcher(&server, Duration::from_secs(5)));

    let (status, body) = send(&app, post_json("/api/submit", &submission())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let requests = wait_for_requests(&server, 1).await;
    assert_eq!(requests.len(), 1);
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["chat_id"], "-100");
    assert_eq!(sent["parse_mode"], "HTML");
    let text = sent["text"].as_str().unwrap();
    assert!(text.contains("12가3456"));
    assert!(text.contains("현대 그랜저 2020"));
    assert!(text.contains("010-1234-5678"));
}

#[tokio::test]
async fn failing_notification_does_not_change_the_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone(), telegram_dispatcher(&server, Duration::from_secs(5)));

    let (status, body) = send(&app, post_json("/api/submit", &submission())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(store.read_all().await.unwrap().len(), 1);

    // Exactly one attempt, no retry.
    assert_eq!(wait_for_requests(&server, 1).await.len(), 1);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn slow_notification_does_not_delay_the_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone(), telegram_dispatcher(&server, Duration::from_secs(30)));

    let (status, _) = tokio::time::timeout(
        Duration::from_secs(2),
        send(&app, post_json("/api/submit", &submission())),
    )
    .await
    .expect("intake must not wait on the notification");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unconfigured_notifier_still_accepts_submissions() {
    let (dispatcher, worker) = NotificationDispatcher::start(None, 16, DRAIN_DEADLINE);
    assert!(worker.is_none());

    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone(), dispatcher);

    let (status, body) = send(&app, post_json("/api/submit", &submission())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(store.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn shutdown_waits_for_notifications_already_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot42:token/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .expect(3)
        .mount(&server)
        .await;

    let (dispatcher, worker) = start_telegram(&server, Duration::from_secs(5));
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone(), dispatcher);
    for _ in 0..3 {
        let (status, _) = send(&app, post_json("/api/submit", &submission())).await;
        assert_eq!(status, StatusCode::OK);
    }

    // Dropping the router closes the queue, as when the server stops.
    let stopped_at = Instant::now();
    drop(app);
    tokio::time::timeout(Duration::from_secs(3), worker.expect("worker"))
        .await
        .expect("worker should finish once in-flight sends complete")
        .expect("worker task");

    assert!(stopped_at.elapsed() >= Duration::from_millis(200));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
    assert_eq!(store.read_all().await.unwrap().len(), 3);
}
