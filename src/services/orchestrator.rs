use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::cookies::{CacheError, CookieCache};
use crate::core::config::AppConfig;
use crate::core::error::{AppError, AppResult};
use crate::executor::{AuthStatus, TaskExecutor, TaskOutcome};
use crate::infrastructure::browser::BrowserAdapter;
use crate::services::auth_gate::{AuthGate, AuthState, GateError, LoginPrompt};

/// Explicit session-id-to-domain mapping, owned here rather than tagged onto
/// the foreign session object.
#[derive(Default)]
pub struct SessionRegistry {
    domains: Mutex<HashMap<Uuid, String>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, domain: String) -> Uuid {
        let id = Uuid::new_v4();
        self.domains.lock().unwrap().insert(id, domain);
        id
    }

    pub fn domain_of(&self, id: Uuid) -> Option<String> {
        self.domains.lock().unwrap().get(&id).cloned()
    }

    pub fn unregister(&self, id: Uuid) {
        self.domains.lock().unwrap().remove(&id);
    }
}

/// Runs one browsing task end to end: cookie injection, auth gate, task
/// execution, and shutdown sequencing.
pub struct Orchestrator<'a> {
    config: &'a AppConfig,
    cache: &'a CookieCache,
    registry: SessionRegistry,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a AppConfig, cache: &'a CookieCache) -> Self {
        Self {
            config,
            cache,
            registry: SessionRegistry::new(),
        }
    }

    pub async fn run(
        &self,
        session: &dyn BrowserAdapter,
        executor: &dyn TaskExecutor,
        prompt: &dyn LoginPrompt,
        cancel: CancellationToken,
    ) -> AppResult<String> {
        let url = &self.config.target_url;
        let domain = CookieCache::domain_of(url)?;
        let session_id = self.registry.register(domain);

        self.cache.ensure_root().await?;

        let gate = AuthGate::new(
            self.cache,
            prompt,
            Duration::from_secs(self.config.login_timeout_secs),
        );

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                info!("Shutdown requested, stopping automated actions");
                Err(AppError::Other(anyhow::anyhow!("terminated by signal")))
            }
            res = self.drive(&gate, session, executor, session_id) => res,
        };

        self.registry.unregister(session_id);
        self.close_session(session).await;

        result
    }

    async fn drive(
        &self,
        gate: &AuthGate<'_>,
        session: &dyn BrowserAdapter,
        executor: &dyn TaskExecutor,
        session_id: Uuid,
    ) -> AppResult<String> {
        let url = &self.config.target_url;
        let domain = self
            .registry
            .domain_of(session_id)
            .unwrap_or_else(|| url.clone());

        session.navigate(url).await?;

        let state = gate.prepare(session, url).await.map_err(flatten_gate)?;
        info!("Auth gate for {}: {:?}", domain, state);

        if state == AuthState::Unauthenticated {
            match executor.probe_auth(url).await? {
                AuthStatus::Authenticated => {
                    info!("Session already authenticated at {}", domain)
                }
                AuthStatus::NeedsLogin => {
                    self.manual_login(gate, session, executor, url).await?;
                }
            }
        }

        let mut outcome = executor.run(&self.config.task).await?;
        if outcome == TaskOutcome::AuthRequired {
            info!("Task stopped on authentication, opening the gate");
            self.manual_login(gate, session, executor, url).await?;
            outcome = executor.run(&self.config.task).await?;
        }

        match outcome {
            TaskOutcome::Completed(summary) => Ok(summary),
            TaskOutcome::AuthRequired => Err(AppError::Other(anyhow::anyhow!(
                "task still authentication-gated after manual login"
            ))),
        }
    }

    /// One manual-login round. A save that fails because storage is
    /// unavailable is reported and the run continues: the session keeps the
    /// cookies it holds, only the next run loses them.
    async fn manual_login(
        &self,
        gate: &AuthGate<'_>,
        session: &dyn BrowserAdapter,
        executor: &dyn TaskExecutor,
        url: &str,
    ) -> AppResult<()> {
        match gate.complete_manual_login(executor, session, url).await {
            Ok(state) => {
                info!("Manual login finished: {:?}", state);
                Ok(())
            }
            Err(GateError::Cache(CacheError::StorageUnavailable(e))) => {
                error!("Could not persist captured cookies: {}", e);
                Ok(())
            }
            Err(e) => Err(flatten_gate(e)),
        }
    }

    /// Best-effort close bounded by a hard timeout; a stuck session never
    /// blocks process termination.
    async fn close_session(&self, session: &dyn BrowserAdapter) {
        let timeout = Duration::from_secs(self.config.close_timeout_secs);
        match tokio::time::timeout(timeout, session.close()).await {
            Ok(Ok(())) => info!("Browser session closed"),
            Ok(Err(e)) => warn!("Error while closing browser session: {}", e),
            Err(_) => warn!("Browser session did not close within {:?}", timeout),
        }
    }
}

fn flatten_gate(e: GateError) -> AppError {
    match e {
        GateError::Cache(c) => AppError::Cache(c),
        GateError::Browser(b) => AppError::Browser(b),
        GateError::Executor(x) => AppError::Executor(x),
        other => AppError::Gate(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_maps_session_to_domain() {
        let registry = SessionRegistry::new();
        let id = registry.register("example.com".to_string());
        assert_eq!(registry.domain_of(id).as_deref(), Some("example.com"));

        registry.unregister(id);
        assert!(registry.domain_of(id).is_none());
    }

    #[test]
    fn test_registry_ids_are_unique() {
        let registry = SessionRegistry::new();
        let a = registry.register("example.com".to_string());
        let b = registry.register("example.com".to_string());
        assert_ne!(a, b);
    }
}
