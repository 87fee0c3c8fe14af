use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{AuthStatus, ExecutorError, TaskExecutor, TaskOutcome};

/// Drives the external LLM browsing agent through its CLI.
///
/// The planning loop, vision grounding and DOM actions all live in the agent
/// tool; this adapter only hands it a task string and interprets its JSON
/// verdicts.
pub struct AgentCliExecutor {
    executable: String,
    session: String,
    api_key: String,
    paused: AtomicBool,
}

impl AgentCliExecutor {
    pub async fn new(session: String, api_key: String) -> Result<Self, ExecutorError> {
        let executable =
            std::env::var("AGENT_BROWSER_PATH").unwrap_or_else(|_| "agent-browser".to_string());

        info!("Initializing agent executor, session: {}", session);

        let probe = Command::new(&executable).arg("--version").output().await;
        if probe.is_err() {
            return Err(ExecutorError::AgentUnavailable(format!(
                "{} not installed or not on PATH",
                executable
            )));
        }

        Ok(Self {
            executable,
            session,
            api_key,
            paused: AtomicBool::new(false),
        })
    }

    async fn exec_json(&self, args: &[&str]) -> Result<Value, ExecutorError> {
        if self.is_paused() {
            return Err(ExecutorError::Paused);
        }

        let mut cmd = Command::new(&self.executable);
        cmd.arg("--session")
            .arg(&self.session)
            .arg("--json")
            .env("GEMINI_API_KEY", &self.api_key);
        for arg in args {
            cmd.arg(arg);
        }

        debug!("Running agent command: {:?}", args);

        let output = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ExecutorError::Backend(format!("Failed to spawn agent: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Agent command failed: {}", stderr);
            return Err(ExecutorError::Backend(stderr.to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .map_err(|e| ExecutorError::Backend(format!("Invalid agent response: {}", e)))
    }
}

#[async_trait]
impl TaskExecutor for AgentCliExecutor {
    async fn run(&self, task: &str) -> Result<TaskOutcome, ExecutorError> {
        let result = self.exec_json(&["run", task]).await?;

        let status = result.get("status").and_then(|v| v.as_str()).unwrap_or("");
        match status {
            "completed" => {
                let summary = result
                    .get("result")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                Ok(TaskOutcome::Completed(summary))
            }
            "auth_required" => Ok(TaskOutcome::AuthRequired),
            other => Err(ExecutorError::TaskFailed(format!(
                "Unexpected agent status '{}'",
                other
            ))),
        }
    }

    async fn probe_auth(&self, url: &str) -> Result<AuthStatus, ExecutorError> {
        let result = self.exec_json(&["probe", "login", url]).await?;

        match result.get("authenticated").and_then(|v| v.as_bool()) {
            Some(true) => Ok(AuthStatus::Authenticated),
            Some(false) => Ok(AuthStatus::NeedsLogin),
            None => Err(ExecutorError::Backend(
                "Probe response missing 'authenticated'".to_string(),
            )),
        }
    }

    fn pause(&self) {
        info!("Pausing agent executor");
        self.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        info!("Resuming agent executor");
        self.paused.store(false, Ordering::SeqCst);
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}
