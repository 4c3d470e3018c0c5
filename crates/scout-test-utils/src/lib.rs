//! Shared testing utilities for the Scout workspace.
//!
//! [`StubServer`] stands in for the chat-completion provider and the
//! classification service: it answers every request with a canned response
//! and records what it received.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

pub use axum::http::{Method, StatusCode};

/// A request captured by a [`StubServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("recorded body is not JSON")
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// HTTP server on an ephemeral local port returning one canned response.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Respond to every request with `status` and a JSON body.
    pub async fn json(status: StatusCode, body: Value) -> Self {
        Self::spawn(status, "application/json", body.to_string()).await
    }

    /// Respond to every request with `status` and a raw body.
    pub async fn spawn(status: StatusCode, content_type: &'static str, body: impl Into<String>) -> Self {
        Self::start(status, content_type, body.into(), None).await
    }

    /// Like [`StubServer::json`], but hold each response for `delay` first.
    pub async fn delayed(delay: Duration, status: StatusCode, body: Value) -> Self {
        Self::start(status, "application/json", body.to_string(), Some(delay)).await
    }

    async fn start(
        status: StatusCode,
        content_type: &'static str,
        body: String,
        delay: Option<Duration>,
    ) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status,
            content_type,
            body,
            delay,
            requests: requests.clone(),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, requests, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("stub request log poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("stub request log poisoned").len()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state
        .requests
        .lock()
        .expect("stub request log poisoned")
        .push(RecordedRequest { method, path: uri.path().to_string(), headers, body });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    (state.status, [(header::CONTENT_TYPE, state.content_type)], state.body).into_response()
}

/// A URL on a local port that nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway local addr");
    drop(listener);
    format!("http://{addr}")
}

/// A well-formed chat-completion response carrying `content`.
pub fn chat_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4-0613",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 21, "completion_tokens": 17, "total_tokens": 38 }
    })
}

/// Install a test-friendly tracing subscriber; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
