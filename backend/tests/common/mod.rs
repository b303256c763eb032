//! Common test utilities for integration tests
//!
//! Every `TestApp` runs against an in-memory store seeded with the
//! catalogue, a scripted model and its own frontend directory.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fitforge_backend::{
    config::AppConfig,
    repositories::MemoryStore,
    routes,
    services::{
        agent::{AssistantReply, ChatMessage, ToolCall, ToolCallFunction},
        AgentError, LlmClient, ToolDefinition,
    },
    state::AppState,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Model double that replays canned turns and records what it was sent
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<AssistantReply>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<AssistantReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn push(&self, reply: AssistantReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Messages sent on each model call so far
    pub async fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat(&self, messages: &[ChatMessage], _tools: &[ToolDefinition]) -> Result<AssistantReply, AgentError> {
        self.requests.lock().await.push(messages.to_vec());
        self.replies
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| AgentError::Upstream("no scripted reply left".to_string()))
    }
}

/// Assistant turn requesting a single tool call
pub fn tool_call(name: &str, arguments: Value) -> AssistantReply {
    AssistantReply {
        content: String::new(),
        tool_calls: vec![ToolCall {
            function: ToolCallFunction {
                name: name.to_string(),
                arguments,
            },
        }],
    }
}

/// Final assistant turn
pub fn text(content: &str) -> AssistantReply {
    AssistantReply {
        content: content.to_string(),
        tool_calls: Vec::new(),
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub llm: Arc<ScriptedLlm>,
    pub frontend_dir: PathBuf,
}

impl TestApp {
    /// Create a test application whose model has no scripted replies
    pub async fn new() -> Self {
        Self::with_replies(Vec::new()).await
    }

    /// Create a test application whose model replays `replies` in order
    pub async fn with_replies(replies: Vec<AssistantReply>) -> Self {
        let llm = Arc::new(ScriptedLlm::new(replies));
        let (app, state, store, frontend_dir) = build(llm.clone()).await;
        Self {
            app,
            state,
            store,
            llm,
            frontend_dir,
        }
    }

    /// Create a test application backed by any model client
    pub async fn with_llm(llm: Arc<dyn LlmClient>) -> Router {
        build(llm).await.0
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        send(&self.app, "GET", path, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        send(&self.app, "POST", path, Some(body)).await
    }

    /// Make a PUT request with JSON body
    pub async fn put(&self, path: &str, body: &str) -> (StatusCode, String) {
        send(&self.app, "PUT", path, Some(body)).await
    }

    /// POST a JSON value and parse the JSON reply
    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let (status, body) = self.post(path, &body.to_string()).await;
        (status, parse(&body))
    }
}

pub async fn send(app: &Router, method: &str, path: &str, body: Option<&str>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_str = String::from_utf8(body.to_vec()).unwrap();

    (status, body_str)
}

pub fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("invalid JSON ({e}): {body}"))
}

async fn build(llm: Arc<dyn LlmClient>) -> (Router, AppState, Arc<MemoryStore>, PathBuf) {
    let frontend_dir = create_frontend_dir().await;

    let mut config = AppConfig::default();
    config.frontend.dir = frontend_dir.to_string_lossy().into_owned();
    config.ai.max_iterations = 5;

    let store = Arc::new(MemoryStore::with_catalogue());
    let state = AppState::new(store.clone(), llm, config);
    let app = routes::create_router(state.clone());

    (app, state, store, frontend_dir)
}

async fn create_frontend_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fitforge-frontend-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(dir.join("static")).await.unwrap();
    tokio::fs::write(dir.join("index.html"), "<html><body>FitForge plan</body></html>")
        .await
        .unwrap();
    tokio::fs::write(dir.join("chat.html"), "<html><body>FitForge chat</body></html>")
        .await
        .unwrap();
    tokio::fs::write(dir.join("static").join("app.css"), "body { margin: 0; }")
        .await
        .unwrap();
    dir
}
