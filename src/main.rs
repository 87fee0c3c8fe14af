use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use webtask::cli::Cli;
use webtask::cookies::CookieCache;
use webtask::core::config::AppConfig;
use webtask::executor::{AgentCliExecutor, ScriptedExecutor, TaskExecutor};
use webtask::infrastructure::browser::mock_adapter::MockBrowserAdapter;
use webtask::infrastructure::browser::playwright_adapter::{LaunchOptions, PlaywrightAdapter};
use webtask::infrastructure::browser::BrowserAdapter;
use webtask::infrastructure::logging::init_logging;
use webtask::services::auth_gate::StdinPrompt;
use webtask::services::orchestrator::Orchestrator;
use webtask::services::shutdown::Shutdown;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("webtask")?;

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.url {
        config.target_url = url;
    }
    if let Some(task) = cli.task {
        config.task = task;
    }
    if cli.headless {
        config.headless = true;
    }
    if let Some(dir) = cli.cookies_dir {
        config.cookies_dir = PathBuf::from(dir);
    }

    info!("Starting webtask");
    info!("Target URL: {}", config.target_url);
    info!("Task: {}", config.task);

    let cache = match config.cookies_file.clone() {
        Some(name) => CookieCache::with_fixed_file(config.cookies_dir.clone(), name),
        None => CookieCache::new(config.cookies_dir.clone()),
    };
    cache.ensure_root().await?;

    let session: Arc<dyn BrowserAdapter> = match cli.backend.as_str() {
        "mock" => Arc::new(MockBrowserAdapter::new()),
        _ => Arc::new(
            PlaywrightAdapter::launch(&LaunchOptions {
                executable: config.browser_path.clone(),
                headless: config.headless,
                ignore_tls_errors: config.ignore_tls_errors,
            })
            .await?,
        ),
    };

    let executor: Arc<dyn TaskExecutor> = match cli.backend.as_str() {
        "mock" => Arc::new(ScriptedExecutor::new()),
        _ => Arc::new(
            AgentCliExecutor::new(
                format!("webtask-{}", uuid::Uuid::new_v4()),
                config.llm_api_key.clone(),
            )
            .await?,
        ),
    };

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    let orchestrator = Orchestrator::new(&config, &cache);
    let prompt = StdinPrompt;

    match orchestrator
        .run(
            session.as_ref(),
            executor.as_ref(),
            &prompt,
            shutdown.token(),
        )
        .await
    {
        Ok(summary) => {
            info!("Task completed: {}", summary);
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
