// tests/common/mod.rs

// Mock completion endpoint shared by the integration tests.
#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_KEY: &str = "test-key";

/// What the mock answers with. `{n}` in `body` is replaced by the 1-based call number.
#[derive(Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn ok(body: &str) -> Self {
        Self { status: StatusCode::OK, body: body.to_string(), delay: Duration::ZERO }
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Self { status, body: body.to_string(), delay: Duration::ZERO }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Value>>>,
}

pub struct MockServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Value>>>,
}

impl MockServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request bodies received so far.
    pub fn seen(&self) -> Vec<Value> {
        self.seen.lock().unwrap().clone()
    }
}

async fn complete(State(state): State<MockState>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, String) {
    let n = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    state.seen.lock().unwrap().push(body);

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TEST_KEY));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, r#"{"error":"bad credential"}"#.to_string());
    }

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }
    (state.reply.status, state.reply.body.replace("{n}", &n.to_string()))
}

/// Starts the mock on an ephemeral port of the current runtime.
pub async fn spawn_mock(reply: MockReply) -> MockServer {
    let state = MockState {
        reply,
        hits: Arc::new(AtomicUsize::new(0)),
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new().route("/v1/completions", post(complete)).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer {
        url: format!("http://{}/v1/completions", addr),
        hits: state.hits,
        seen: state.seen,
    }
}

/// An address nothing is listening on.
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1/completions", addr)
}
