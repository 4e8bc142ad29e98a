//! HTTP connector against a local axum backend.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use bitmask_api::{BitmaskClient, ClientConfig, ClientError, Command, Event, HttpConnector, Transport};
use serde_json::{json, Value};

async fn active_user() -> Json<Value> {
    Json(json!({"result": {"user": "<none>"}, "error": null}))
}

async fn broken_status() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn garbage() -> &'static str {
    "{not json"
}

/// Echoes the JSON array body back as the result.
async fn echo(Json(args): Json<Value>) -> Json<Value> {
    Json(json!({"result": args, "error": null}))
}

async fn missing_key() -> Json<Value> {
    Json(json!({"result": null, "error": "Key not found"}))
}

/// First poll yields an event, later polls report nothing.
async fn poll(State(polls): State<Arc<AtomicUsize>>) -> Json<Value> {
    if polls.fetch_add(1, Ordering::SeqCst) == 0 {
        Json(json!({"result": ["MAIL_SERVICE_STARTED", ["alice@example.org"]], "error": null}))
    } else {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Json(json!({"result": null, "error": null}))
    }
}

async fn spawn_backend() -> SocketAddr {
    let polls = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/API/user/active", post(active_user))
        .route("/API/mail/status", post(broken_status))
        .route("/API/keys/list", post(garbage))
        .route("/API/keys/export", post(missing_key))
        .route("/API/events/register", post(echo))
        .route("/API/events/poll", post(poll))
        .with_state(polls);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(format!("http://{addr}/API"))
        .with_poll_backoff(Duration::from_millis(50))
}

fn transport(addr: SocketAddr) -> Transport<HttpConnector> {
    Transport::new(HttpConnector::new(&config(addr)).unwrap())
}

#[tokio::test]
async fn test_success_resolves_result() {
    let addr = spawn_backend().await;
    let value = transport(addr).call(&Command::UserActive).await.unwrap();
    assert_eq!(value, json!({"user": "<none>"}));
}

#[tokio::test]
async fn test_arguments_are_posted_as_json_array() {
    let addr = spawn_backend().await;
    let value = transport(addr)
        .call(&Command::EventsRegister {
            event: "MAIL_SERVICE_STARTED".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(value, json!(["MAIL_SERVICE_STARTED"]));
}

#[tokio::test]
async fn test_non_success_status() {
    let addr = spawn_backend().await;
    let error = transport(addr).call(&Command::MailStatus).await.unwrap_err();
    assert_eq!(
        error,
        ClientError::Transport {
            status: 500,
            status_text: "Internal Server Error".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_body_is_protocol_error() {
    let addr = spawn_backend().await;
    let error = transport(addr)
        .call(&Command::KeysList {
            kind: Default::default(),
        })
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::Protocol(_)));
}

#[tokio::test]
async fn test_backend_error_is_verbatim() {
    let addr = spawn_backend().await;
    let client = BitmaskClient::<HttpConnector>::connect(config(addr)).unwrap();
    let error = client.keys().export("nobody@example.org", None).await.unwrap_err();
    assert_eq!(error.to_string(), "Key not found");
}

#[tokio::test]
async fn test_unknown_route_is_transport_error() {
    let addr = spawn_backend().await;
    let error = transport(addr).call(&Command::MailGetToken).await.unwrap_err();
    assert!(matches!(error, ClientError::Transport { status: 404, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = transport(addr).call(&Command::UserActive).await.unwrap_err();
    assert_eq!(error.to_string(), "Network Error");
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_poller_over_http() {
    let addr = spawn_backend().await;
    let client = BitmaskClient::<HttpConnector>::connect(config(addr)).unwrap();
    client
        .events()
        .subscribe("MAIL_SERVICE_STARTED")
        .await
        .unwrap();

    let mut events = client.start_events().unwrap();
    let event = tokio::time::timeout(Duration::from_secs(5), events.next_event())
        .await
        .unwrap()
        .unwrap();
    client.stop_events().await;

    assert_eq!(
        event,
        Event::new("MAIL_SERVICE_STARTED", vec!["alice@example.org".to_string()])
    );
}
