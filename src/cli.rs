use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "webtask")]
#[command(about = "Run a natural-language browsing task with per-domain cookie persistence", long_about = None)]
pub struct Cli {
    /// Target URL the task runs against (overrides TARGET_URL)
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Natural-language task handed to the agent (overrides TASK)
    #[arg(short, long, value_name = "TEXT")]
    pub task: Option<String>,

    /// Browser backend to use
    #[arg(long, default_value = "playwright")]
    pub backend: String,

    /// Run the browser headless
    #[arg(long)]
    pub headless: bool,

    /// Directory holding per-domain cookie files
    #[arg(long, value_name = "DIR")]
    pub cookies_dir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["webtask"]).unwrap();
        assert_eq!(cli.backend, "playwright");
        assert!(cli.url.is_none());
        assert!(!cli.headless);
    }

    #[test]
    fn test_cli_with_url_short() {
        let cli = Cli::try_parse_from(["webtask", "-u", "https://example.com"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_cli_with_task_and_backend() {
        let cli = Cli::try_parse_from([
            "webtask",
            "--task",
            "compare prices",
            "--backend",
            "mock",
        ])
        .unwrap();
        assert_eq!(cli.task.as_deref(), Some("compare prices"));
        assert_eq!(cli.backend, "mock");
    }
}
