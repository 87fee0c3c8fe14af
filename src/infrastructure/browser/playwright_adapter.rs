use super::{BrowserAdapter, BrowserCookie, BrowserError};
use async_trait::async_trait;
use playwright::api::{Browser, BrowserContext, Page};
use playwright::Playwright;
use std::path::PathBuf;

pub struct LaunchOptions {
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub ignore_tls_errors: bool,
}

pub struct PlaywrightAdapter {
    _playwright: Playwright,
    browser: Browser,
    context: BrowserContext,
    page: Page,
}

impl PlaywrightAdapter {
    pub async fn launch(options: &LaunchOptions) -> Result<Self, BrowserError> {
        let playwright = Playwright::initialize().await.map_err(|e| {
            BrowserError::LaunchFailed(format!("Failed to initialize Playwright: {}", e))
        })?;

        let chromium = playwright.chromium();

        let mut launcher = chromium.launcher().headless(options.headless);
        if let Some(ref path) = options.executable {
            launcher = launcher.executable(path);
        }

        let mut args: Vec<String> = Vec::new();
        if options.ignore_tls_errors {
            args.push("--ignore-certificate-errors".to_string());
        }
        launcher = launcher.args(&args);

        let browser = launcher
            .launch()
            .await
            .map_err(|e| BrowserError::LaunchFailed(format!("Failed to launch Chromium: {}", e)))?;

        let context = browser
            .context_builder()
            .build()
            .await
            .map_err(|e| BrowserError::Other(format!("Failed to create context: {}", e)))?;

        let page = context
            .new_page()
            .await
            .map_err(|e| BrowserError::Other(format!("Failed to create new page: {}", e)))?;

        Ok(Self {
            _playwright: playwright,
            browser,
            context,
            page,
        })
    }
}

#[async_trait]
impl BrowserAdapter for PlaywrightAdapter {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto_builder(url)
            .goto()
            .await
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        self.page
            .url()
            .map_err(|e| BrowserError::Other(format!("Failed to get current URL: {}", e)))
    }

    async fn get_cookies(&self) -> Result<Vec<BrowserCookie>, BrowserError> {
        let cookies = self
            .context
            .cookies(&[])
            .await
            .map_err(|e| BrowserError::Other(format!("Failed to get cookies: {}", e)))?;

        Ok(cookies
            .into_iter()
            .map(|c| BrowserCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
                expires: c.expires,
                http_only: c.http_only,
                secure: c.secure,
                same_site: c.same_site.map(|s| format!("{:?}", s)),
                extra: serde_json::Map::new(),
            })
            .collect())
    }

    async fn set_cookies(&self, cookies: &[BrowserCookie]) -> Result<(), BrowserError> {
        // Both representations serialize as the camelCase wire format, so
        // bridging through JSON keeps every field the session understands.
        let value = serde_json::to_value(cookies)
            .map_err(|e| BrowserError::Other(format!("Failed to serialize cookies: {}", e)))?;
        let native: Vec<playwright::api::Cookie> = serde_json::from_value(value)
            .map_err(|e| BrowserError::Other(format!("Failed to convert cookies: {}", e)))?;

        self.context
            .add_cookies(&native)
            .await
            .map_err(|e| BrowserError::Other(format!("Failed to set cookies: {}", e)))?;
        Ok(())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.browser
            .close()
            .await
            .map_err(|e| BrowserError::CloseFailed(e.to_string()))?;
        Ok(())
    }
}
