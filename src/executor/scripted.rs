use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use super::{AuthStatus, ExecutorError, TaskExecutor, TaskOutcome};

/// Executor double with pre-scripted outcomes, for tests and the mock backend.
#[derive(Default)]
pub struct ScriptedExecutor {
    run_outcomes: Mutex<VecDeque<Result<TaskOutcome, ExecutorError>>>,
    probe_outcomes: Mutex<VecDeque<Result<AuthStatus, ExecutorError>>>,
    paused: AtomicBool,
    events: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_run(&self, outcome: Result<TaskOutcome, ExecutorError>) {
        self.run_outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn push_probe(&self, outcome: Result<AuthStatus, ExecutorError>) {
        self.probe_outcomes.lock().unwrap().push_back(outcome);
    }

    /// Chronological pause/resume/run history, for asserting protocol order.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }
}

#[async_trait]
impl TaskExecutor for ScriptedExecutor {
    async fn run(&self, task: &str) -> Result<TaskOutcome, ExecutorError> {
        if self.is_paused() {
            return Err(ExecutorError::Paused);
        }
        info!("[Scripted] run: {}", task);
        self.record(format!("run:{task}"));
        self.run_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(TaskOutcome::Completed(String::new())))
    }

    async fn probe_auth(&self, url: &str) -> Result<AuthStatus, ExecutorError> {
        self.record(format!("probe:{url}"));
        self.probe_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(AuthStatus::Authenticated))
    }

    fn pause(&self) {
        self.record("pause");
        self.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.record("resume");
        self.paused.store(false, Ordering::SeqCst);
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}
