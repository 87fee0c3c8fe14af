use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_COOKIES_DIR: &str = "saved_cookies";
const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 300;
const DEFAULT_CLOSE_TIMEOUT_SECS: u64 = 5;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Credential for the LLM backend driving the agent library.
    /// Validated at startup, consumed by the external executor.
    pub llm_api_key: String,
    pub target_url: String,
    pub task: String,
    /// Custom browser executable; playwright's bundled Chromium when unset.
    pub browser_path: Option<PathBuf>,
    pub headless: bool,
    pub ignore_tls_errors: bool,
    pub cookies_dir: PathBuf,
    /// Fixed cookies filename overriding per-domain derivation.
    pub cookies_file: Option<String>,
    pub login_timeout_secs: u64,
    pub close_timeout_secs: u64,
}

impl AppConfig {
    /// Pure constructor for testing
    pub fn new(
        llm_api_key: String,
        target_url: String,
        task: String,
        cookies_dir: PathBuf,
    ) -> Self {
        Self {
            llm_api_key,
            target_url,
            task,
            browser_path: None,
            headless: false,
            ignore_tls_errors: false,
            cookies_dir,
            cookies_file: None,
            login_timeout_secs: DEFAULT_LOGIN_TIMEOUT_SECS,
            close_timeout_secs: DEFAULT_CLOSE_TIMEOUT_SECS,
        }
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let llm_api_key =
            env::var("GEMINI_API_KEY").context("GEMINI_API_KEY environment variable is not set")?;
        let target_url =
            env::var("TARGET_URL").context("TARGET_URL environment variable is not set")?;
        let task = env::var("TASK").unwrap_or_else(|_| {
            format!("Go to {target_url}, wait for login if needed, then describe the page.")
        });

        let browser_path = env::var("BROWSER_PATH").ok().map(PathBuf::from);
        let headless = env_flag("HEADLESS");
        let ignore_tls_errors = env_flag("IGNORE_TLS_ERRORS");

        let cookies_dir = env::var("COOKIES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_COOKIES_DIR));
        let cookies_file = env::var("COOKIES_FILE").ok();

        let login_timeout_secs = env_u64("LOGIN_TIMEOUT_SECS", DEFAULT_LOGIN_TIMEOUT_SECS)?;
        let close_timeout_secs = env_u64("CLOSE_TIMEOUT_SECS", DEFAULT_CLOSE_TIMEOUT_SECS)?;

        Ok(Self {
            llm_api_key,
            target_url,
            task,
            browser_path,
            headless,
            ignore_tls_errors,
            cookies_dir,
            cookies_file,
            login_timeout_secs,
            close_timeout_secs,
        })
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(v) => v
            .parse::<u64>()
            .with_context(|| format!("{name} must be a positive integer, got '{v}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = AppConfig::new(
            "key".to_string(),
            "https://example.com".to_string(),
            "describe the page".to_string(),
            PathBuf::from("saved_cookies"),
        );
        assert!(!config.headless);
        assert!(!config.ignore_tls_errors);
        assert_eq!(config.login_timeout_secs, DEFAULT_LOGIN_TIMEOUT_SECS);
        assert_eq!(config.close_timeout_secs, DEFAULT_CLOSE_TIMEOUT_SECS);
        assert!(config.cookies_file.is_none());
    }
}
