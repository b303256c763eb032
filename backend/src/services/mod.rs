//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the store, the model server and the HTTP layer.

pub mod agent;
pub mod profile;
pub mod prompts;
pub mod sessions;
pub mod toolkit;
pub mod tools;

pub use agent::{Agent, AgentError, AgentRun, LlmClient, OllamaClient};
pub use profile::ProfileService;
pub use sessions::SessionStore;
pub use toolkit::FitnessToolkit;
pub use tools::{ToolDefinition, ToolError, ToolOutput, ToolRegistry};
