use async_trait::async_trait;
use thiserror::Error;

pub mod agent_cli;
pub mod scripted;

pub use agent_cli::AgentCliExecutor;
pub use scripted::ScriptedExecutor;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Agent executable unavailable: {0}")]
    AgentUnavailable(String),
    #[error("Task execution failed: {0}")]
    TaskFailed(String),
    #[error("Executor is paused")]
    Paused,
    #[error("Agent backend error: {0}")]
    Backend(String),
}

/// Result of a task run as judged by the agent backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed(String),
    /// The backend decided the site wants a login before the task can proceed.
    AuthRequired,
}

/// Outcome of a login probe. Real errors (network failure, malformed page)
/// come back as `Err`, never folded into `NeedsLogin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    NeedsLogin,
}

/// Autonomous task executor capability: accepts a natural-language task and
/// drives a browsing session toward it. Pausable so a human can take over the
/// browser without the agent racing them.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Run one natural-language task to completion or an auth stop.
    async fn run(&self, task: &str) -> Result<TaskOutcome, ExecutorError>;

    /// Ask the backend whether the session is logged in at `url`.
    async fn probe_auth(&self, url: &str) -> Result<AuthStatus, ExecutorError>;

    /// Stop issuing automated actions until `resume` is called.
    fn pause(&self);

    fn resume(&self);

    fn is_paused(&self) -> bool;
}
