use super::{BrowserAdapter, BrowserCookie, BrowserError};
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

/// In-memory session for tests: a navigation log and a cookie jar.
#[derive(Default)]
pub struct MockBrowserAdapter {
    current_url: Mutex<String>,
    jar: Mutex<Vec<BrowserCookie>>,
    closed: Mutex<bool>,
}

impl MockBrowserAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookies(cookies: Vec<BrowserCookie>) -> Self {
        let adapter = Self::default();
        *adapter.jar.lock().unwrap() = cookies;
        adapter
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl BrowserAdapter for MockBrowserAdapter {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        info!("[Mock] Navigating to {}", url);
        *self.current_url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        Ok(self.current_url.lock().unwrap().clone())
    }

    async fn get_cookies(&self) -> Result<Vec<BrowserCookie>, BrowserError> {
        info!("[Mock] Getting cookies");
        Ok(self.jar.lock().unwrap().clone())
    }

    async fn set_cookies(&self, cookies: &[BrowserCookie]) -> Result<(), BrowserError> {
        info!("[Mock] Setting {} cookies", cookies.len());
        self.jar.lock().unwrap().extend_from_slice(cookies);
        Ok(())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        info!("[Mock] Closing session");
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}
