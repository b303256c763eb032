//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Build expensive resources once**: store, HTTP client and registry are created at startup
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Sessions are the only mutable state**, behind their own lock

use crate::config::AppConfig;
use crate::repositories::FitnessStore;
use crate::services::{Agent, FitnessToolkit, LlmClient, SessionStore, ToolRegistry};
use crate::services::prompts::COACH_INSTRUCTIONS;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Knowledge base and training logs
    pub store: Arc<dyn FitnessStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Coaching agent wired to the tool registry
    pub agent: Arc<Agent>,
    /// Chat conversations
    pub sessions: Arc<SessionStore>,
    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    pub fn new(store: Arc<dyn FitnessStore>, llm: Arc<dyn LlmClient>, config: AppConfig) -> Self {
        let registry = ToolRegistry::new(FitnessToolkit::new(store.clone()));
        let agent = Agent::new(llm, registry, COACH_INSTRUCTIONS, config.ai.max_iterations);
        let sessions = SessionStore::new(config.sessions.max_history_messages);

        Self {
            store,
            config: Arc::new(config),
            agent: Arc::new(agent),
            sessions: Arc::new(sessions),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the store
    #[inline]
    pub fn store(&self) -> &dyn FitnessStore {
        self.store.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the tool registry
    #[inline]
    pub fn tools(&self) -> &ToolRegistry {
        self.agent.registry()
    }
}
