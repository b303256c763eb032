//! Coaching agent
//!
//! A tool-calling loop over a chat model:
//! 1. Prepend the coach persona as the system message
//! 2. Send the conversation plus tool definitions to the model
//! 3. Execute requested tool calls through the [`ToolRegistry`]
//! 4. Feed results back as tool messages and repeat until a text-only reply
//!
//! The model is reached through the [`LlmClient`] trait; [`OllamaClient`]
//! talks to an Ollama server's `/api/chat` endpoint.

use super::tools::{ToolDefinition, ToolError, ToolRegistry};
use crate::repositories::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Returned when the loop ends without a final text reply
pub const NO_FINAL_RESPONSE: &str = "[Agent did not produce a final response]";

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub function: ToolCallFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// A message in the agent conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    #[serde(default)]
    pub content: String,
    /// Tool calls made by the assistant
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Tool that produced a tool message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::assistant(content)
        }
    }

    pub fn tool(tool_name: &str, content: impl Into<String>) -> Self {
        Self {
            tool_name: Some(tool_name.to_string()),
            ..Self::new(MessageRole::Tool, content)
        }
    }
}

/// One model turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Model server error: {0}")]
    Upstream(String),

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("Tool execution failed: {0}")]
    Tool(#[source] StoreError),
}

// ============================================================================
// Model Client
// ============================================================================

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the conversation and available tools, returning the next turn
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Result<AssistantReply, AgentError>;
}

/// Client for an Ollama server
#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    tools: &'a [ToolDefinition],
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::Upstream(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Result<AssistantReply, AgentError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = OllamaChatRequest {
            model: &self.model,
            messages,
            tools,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AgentError::Upstream(format!("{} returned {}: {}", url, status, detail)));
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;

        Ok(AssistantReply {
            content: parsed.message.content.unwrap_or_default(),
            tool_calls: parsed.message.tool_calls.unwrap_or_default(),
        })
    }
}

// ============================================================================
// Agent Loop
// ============================================================================

/// Record of a tool call executed during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutedToolCall {
    pub name: String,
    pub arguments: Value,
    pub result: String,
    pub is_error: bool,
}

/// Outcome of an agent run
#[derive(Debug, Clone)]
pub struct AgentRun {
    /// Final text reply
    pub content: String,
    pub tool_calls: Vec<ExecutedToolCall>,
    /// Model round-trips performed
    pub iterations: usize,
    /// Conversation including this run's messages
    pub history: Vec<ChatMessage>,
}

/// Coach that answers with the help of the tool registry
#[derive(Clone)]
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    registry: ToolRegistry,
    instructions: String,
    max_iterations: usize,
}

impl Agent {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        registry: ToolRegistry,
        instructions: impl Into<String>,
        max_iterations: usize,
    ) -> Self {
        Self {
            llm,
            registry,
            instructions: instructions.into(),
            max_iterations,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Continue `history` with a user message and run until a final reply.
    ///
    /// Unknown tools and malformed arguments are reported back to the model
    /// as `Error: ...` tool messages. Store failures abort the run.
    pub async fn run(&self, history: Vec<ChatMessage>, user_message: &str) -> Result<AgentRun, AgentError> {
        let started = Instant::now();
        let mut messages = history;
        if !messages.iter().any(|m| m.role == MessageRole::System) {
            messages.insert(0, ChatMessage::system(self.instructions.as_str()));
        }
        messages.push(ChatMessage::user(user_message));

        let mut executed = Vec::new();

        for iteration in 1..=self.max_iterations {
            let reply = self.llm.chat(&messages, self.registry.definitions()).await?;
            debug!(iteration, tool_calls = reply.tool_calls.len(), "Model replied");

            if reply.tool_calls.is_empty() {
                let content = if reply.content.trim().is_empty() {
                    NO_FINAL_RESPONSE.to_string()
                } else {
                    reply.content
                };
                messages.push(ChatMessage::assistant(content.as_str()));
                record_run("completed", iteration, started);
                return Ok(AgentRun {
                    content,
                    tool_calls: executed,
                    iterations: iteration,
                    history: messages,
                });
            }

            messages.push(ChatMessage::assistant_with_tools(reply.content, reply.tool_calls.clone()));

            for call in reply.tool_calls {
                let name = call.function.name;
                let arguments = call.function.arguments;

                let (result, is_error) = match self.registry.invoke(&name, arguments.clone()).await {
                    Ok(output) => (output.to_model_content(), false),
                    Err(ToolError::Store(e)) => {
                        record_run("tool_failed", iteration, started);
                        return Err(AgentError::Tool(e));
                    }
                    Err(e) => (format!("Error: {}", e), true),
                };

                messages.push(ChatMessage::tool(&name, result.as_str()));
                executed.push(ExecutedToolCall {
                    name,
                    arguments,
                    result,
                    is_error,
                });
            }
        }

        warn!(max_iterations = self.max_iterations, "Agent reached iteration limit without a final reply");
        record_run("iteration_limit", self.max_iterations, started);

        Ok(AgentRun {
            content: NO_FINAL_RESPONSE.to_string(),
            tool_calls: executed,
            iterations: self.max_iterations,
            history: messages,
        })
    }
}

fn record_run(outcome: &'static str, iterations: usize, started: Instant) {
    let elapsed = started.elapsed();
    metrics::counter!("fitforge_agent_runs_total", "outcome" => outcome).increment(1);
    metrics::histogram!("fitforge_agent_run_duration_seconds").record(elapsed.as_secs_f64());
    info!(outcome, iterations, elapsed_ms = elapsed.as_millis() as u64, "Agent run finished");
}
