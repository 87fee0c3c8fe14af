use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cookies::{CacheError, CookieCache};
use crate::executor::{ExecutorError, TaskExecutor};
use crate::infrastructure::browser::{BrowserAdapter, BrowserError};

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Manual login not completed within {0:?}")]
    AuthenticationTimeout(Duration),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error("Login prompt failed: {0}")]
    Prompt(String),
}

/// Gate progress, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    AuthenticatedFromCache,
    NeedsManualLogin,
    CookiesCaptured,
    Resumed,
}

/// Blocks until the operator confirms manual login is complete.
#[async_trait]
pub trait LoginPrompt: Send + Sync {
    async fn wait_for_confirmation(&self, domain: &str) -> Result<(), GateError>;
}

/// Operator confirmation over stdin, the sole user-facing control surface.
pub struct StdinPrompt;

#[async_trait]
impl LoginPrompt for StdinPrompt {
    async fn wait_for_confirmation(&self, domain: &str) -> Result<(), GateError> {
        println!("Authentication required for {domain}. Please log in manually in the browser.");
        println!("Press Enter after you've completed the login...");

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|e| GateError::Prompt(e.to_string()))?;
        Ok(())
    }
}

/// Two-state handshake between the cookie cache and the task executor:
/// inject cached cookies up front, and when the executor reports an
/// authentication stop, pause it, let the human log in, capture the jar,
/// persist it, resume.
pub struct AuthGate<'a> {
    cache: &'a CookieCache,
    prompt: &'a dyn LoginPrompt,
    login_timeout: Duration,
}

impl<'a> AuthGate<'a> {
    pub fn new(cache: &'a CookieCache, prompt: &'a dyn LoginPrompt, login_timeout: Duration) -> Self {
        Self {
            cache,
            prompt,
            login_timeout,
        }
    }

    /// Load cached cookies for `url` and inject them into the session.
    ///
    /// A corrupt cache file propagates; callers choose between strict abort
    /// and degraded continue.
    pub async fn prepare(
        &self,
        session: &dyn BrowserAdapter,
        url: &str,
    ) -> Result<AuthState, GateError> {
        match self.cache.load(url).await? {
            Some(cookies) if !cookies.is_empty() => {
                info!("Injecting {} cached cookies for {}", cookies.len(), url);
                session.set_cookies(&cookies).await?;
                Ok(AuthState::AuthenticatedFromCache)
            }
            _ => Ok(AuthState::Unauthenticated),
        }
    }

    /// Drive the manual-login handshake after a `NeedsLogin` judgment.
    ///
    /// The executor is paused for the whole human interaction and resumed
    /// before this returns, except on timeout, where the caller is expected
    /// to abort the run. A failed save comes back as an error after the
    /// resume: the cookies already in the live session are untouched, only
    /// the next run loses the benefit.
    pub async fn complete_manual_login(
        &self,
        executor: &dyn TaskExecutor,
        session: &dyn BrowserAdapter,
        url: &str,
    ) -> Result<AuthState, GateError> {
        info!("Entering manual login for {}", url);
        executor.pause();

        let confirmed =
            tokio::time::timeout(self.login_timeout, self.prompt.wait_for_confirmation(url)).await;
        match confirmed {
            Ok(result) => result?,
            Err(_) => {
                warn!("No login confirmation within {:?}", self.login_timeout);
                return Err(GateError::AuthenticationTimeout(self.login_timeout));
            }
        }

        let cookies = session.get_cookies().await?;
        info!("Captured {} cookies after manual login", cookies.len());

        let saved = self.cache.save(url, &cookies).await;
        executor.resume();
        saved?;

        Ok(AuthState::Resumed)
    }
}
