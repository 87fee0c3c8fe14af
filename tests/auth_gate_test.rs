use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use webtask::cookies::CookieCache;
use webtask::core::config::AppConfig;
use webtask::executor::{AuthStatus, ScriptedExecutor, TaskExecutor, TaskOutcome};
use webtask::infrastructure::browser::mock_adapter::MockBrowserAdapter;
use webtask::infrastructure::browser::{BrowserAdapter, BrowserCookie};
use webtask::services::auth_gate::{AuthGate, AuthState, GateError, LoginPrompt};
use webtask::services::orchestrator::Orchestrator;

struct InstantPrompt;

#[async_trait]
impl LoginPrompt for InstantPrompt {
    async fn wait_for_confirmation(&self, _domain: &str) -> Result<(), GateError> {
        Ok(())
    }
}

struct NeverPrompt;

#[async_trait]
impl LoginPrompt for NeverPrompt {
    async fn wait_for_confirmation(&self, _domain: &str) -> Result<(), GateError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

fn session_cookie() -> BrowserCookie {
    let mut c = BrowserCookie::new("sid", "abc123");
    c.domain = Some("example.com".to_string());
    c.path = Some("/".to_string());
    c.secure = Some(true);
    c
}

fn test_config(cookies_dir: PathBuf) -> AppConfig {
    let mut config = AppConfig::new(
        "test-key".to_string(),
        "https://example.com/login".to_string(),
        "list what you see".to_string(),
        cookies_dir,
    );
    config.login_timeout_secs = 5;
    config.close_timeout_secs = 1;
    config
}

#[tokio::test]
async fn test_prepare_without_cache_is_unauthenticated() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CookieCache::new(dir.path());
    let prompt = InstantPrompt;
    let gate = AuthGate::new(&cache, &prompt, Duration::from_secs(5));
    let session = MockBrowserAdapter::new();

    let state = gate.prepare(&session, "https://example.com/").await.unwrap();
    assert_eq!(state, AuthState::Unauthenticated);
    assert!(session.get_cookies().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_prepare_injects_cached_cookies() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CookieCache::new(dir.path());
    cache
        .save("https://example.com/", &[session_cookie()])
        .await
        .unwrap();

    let prompt = InstantPrompt;
    let gate = AuthGate::new(&cache, &prompt, Duration::from_secs(5));
    let session = MockBrowserAdapter::new();

    let state = gate.prepare(&session, "https://example.com/").await.unwrap();
    assert_eq!(state, AuthState::AuthenticatedFromCache);

    let jar = session.get_cookies().await.unwrap();
    assert_eq!(jar, vec![session_cookie()]);
}

#[tokio::test]
async fn test_manual_login_pauses_captures_and_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CookieCache::new(dir.path());
    let prompt = InstantPrompt;
    let gate = AuthGate::new(&cache, &prompt, Duration::from_secs(5));

    let session = MockBrowserAdapter::with_cookies(vec![session_cookie()]);
    let executor = ScriptedExecutor::new();

    let state = gate
        .complete_manual_login(&executor, &session, "https://example.com/")
        .await
        .unwrap();
    assert_eq!(state, AuthState::Resumed);
    assert!(!executor.is_paused());
    assert_eq!(executor.events(), vec!["pause", "resume"]);

    // Captured jar landed on disk
    let saved = cache.load("https://example.com/").await.unwrap().unwrap();
    assert_eq!(saved, vec![session_cookie()]);
}

#[tokio::test]
async fn test_manual_login_times_out_with_explicit_error() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CookieCache::new(dir.path());
    let prompt = NeverPrompt;
    let gate = AuthGate::new(&cache, &prompt, Duration::from_millis(50));

    let session = MockBrowserAdapter::new();
    let executor = ScriptedExecutor::new();

    let result = gate
        .complete_manual_login(&executor, &session, "https://example.com/")
        .await;
    assert!(matches!(result, Err(GateError::AuthenticationTimeout(_))));

    // No automated actions resume after an aborted login
    assert!(executor.is_paused());
    assert!(cache.load("https://example.com/").await.unwrap().is_none());
}

#[tokio::test]
async fn test_orchestrator_runs_login_handshake_then_task() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_path_buf());
    let cache = CookieCache::new(dir.path());

    let session = MockBrowserAdapter::with_cookies(vec![session_cookie()]);
    let executor = ScriptedExecutor::new();
    executor.push_probe(Ok(AuthStatus::NeedsLogin));
    executor.push_run(Ok(TaskOutcome::Completed("done".to_string())));

    let orchestrator = Orchestrator::new(&config, &cache);
    let summary = orchestrator
        .run(&session, &executor, &InstantPrompt, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary, "done");
    assert!(session.is_closed());

    // Handshake ordering: probe, pause, resume, then the task run
    let events = executor.events();
    assert_eq!(
        events,
        vec![
            "probe:https://example.com/login",
            "pause",
            "resume",
            "run:list what you see",
        ]
    );

    let saved = cache
        .load("https://example.com/anything")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved, vec![session_cookie()]);
}

#[tokio::test]
async fn test_orchestrator_reruns_task_after_auth_stop() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_path_buf());
    let cache = CookieCache::new(dir.path());

    // Cached cookies exist, so no probe round: the task itself reports the
    // auth stop and is rerun after the gate.
    cache
        .save("https://example.com/", &[session_cookie()])
        .await
        .unwrap();

    let session = MockBrowserAdapter::new();
    let executor = ScriptedExecutor::new();
    executor.push_run(Ok(TaskOutcome::AuthRequired));
    executor.push_run(Ok(TaskOutcome::Completed("second try".to_string())));

    let orchestrator = Orchestrator::new(&config, &cache);
    let summary = orchestrator
        .run(&session, &executor, &InstantPrompt, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary, "second try");
    assert!(session.is_closed());
}

#[tokio::test]
async fn test_orchestrator_shuts_down_on_cancellation() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_path_buf());
    let cache = CookieCache::new(dir.path());

    let session = MockBrowserAdapter::new();
    let executor = ScriptedExecutor::new();
    // Park the run in the manual-login prompt so cancellation races nothing
    executor.push_probe(Ok(AuthStatus::NeedsLogin));

    let cancel = CancellationToken::new();
    let orchestrator = Orchestrator::new(&config, &cache);

    let run = orchestrator.run(&session, &executor, &NeverPrompt, cancel.clone());
    tokio::pin!(run);

    tokio::select! {
        _ = &mut run => panic!("run finished before cancellation"),
        _ = tokio::time::sleep(Duration::from_millis(50)) => cancel.cancel(),
    }

    let result = run.await;
    assert!(result.is_err());
    assert!(session.is_closed());
}
