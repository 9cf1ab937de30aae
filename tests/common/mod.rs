#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use call_insight::analyzer::Analyzer;
use call_insight::api::routes::create_router;
use call_insight::call_log::CallLog;
use call_insight::error::{AppError, Result};
use call_insight::llm::{ChatBackend, ChatRequest};
use call_insight::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

/// Backend that replays one canned reply and records what it was asked.
pub struct ScriptedBackend {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone().map_err(AppError::LlmError)
    }
}

pub struct TestApp {
    pub router: Router,
    pub log_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn new(backend: Option<Arc<dyn ChatBackend>>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("call_analysis.txt");
        let state = AppState {
            analyzer: Arc::new(Analyzer::new(backend)),
            call_log: Arc::new(CallLog::new(log_path.clone())),
        };

        Self {
            router: create_router(state),
            log_path,
            _dir: dir,
        }
    }

    pub fn log_text(&self) -> String {
        std::fs::read_to_string(&self.log_path).unwrap_or_default()
    }

    pub fn log_entries(&self) -> usize {
        self.log_text().matches("Log Entry: ").count()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_transcript(&self, transcript: &str) -> (StatusCode, String) {
        self.post_form(&format!("transcript={}", form_encode(transcript))).await
    }

    pub async fn post_form(&self, body: &str) -> (StatusCode, String) {
        send(self.router.clone(), form_request(body)).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        send(self.router.clone(), request).await
    }
}

pub fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn form_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}
