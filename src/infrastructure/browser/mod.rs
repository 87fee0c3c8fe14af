use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod mock_adapter;
pub mod playwright_adapter;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),
    #[error("Launch failed: {0}")]
    LaunchFailed(String),
    #[error("Close failed: {0}")]
    CloseFailed(String),
    #[error("Browser error: {0}")]
    Other(String),
}

/// One HTTP cookie as produced by the browsing session.
///
/// Fields are transported, not interpreted: everything the session supplies
/// beyond the known attributes is kept verbatim in `extra` so a saved cookie
/// file round-trips the session's native representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
    #[serde(flatten, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BrowserCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            expires: None,
            http_only: None,
            secure: None,
            same_site: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Browsing session capability: an open, navigable page with its own cookie jar.
#[async_trait]
pub trait BrowserAdapter: Send + Sync {
    /// Navigate to a specific URL
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// URL the page is currently on
    async fn current_url(&self) -> Result<String, BrowserError>;

    /// Get all cookies from the session's jar
    async fn get_cookies(&self) -> Result<Vec<BrowserCookie>, BrowserError>;

    /// Inject cookies into the session's jar
    async fn set_cookies(&self, cookies: &[BrowserCookie]) -> Result<(), BrowserError>;

    /// Close the session and release the underlying browser
    async fn close(&self) -> Result<(), BrowserError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_roundtrips_unknown_fields() {
        let raw = r#"{"name":"sid","value":"abc123","domain":"example.com","path":"/","secure":true,"priority":"High"}"#;
        let cookie: BrowserCookie = serde_json::from_str(raw).unwrap();
        assert_eq!(cookie.name, "sid");
        assert_eq!(cookie.extra.get("priority").unwrap(), "High");

        let back = serde_json::to_value(&cookie).unwrap();
        assert_eq!(back.get("priority").unwrap(), "High");
        assert_eq!(back.get("secure").unwrap(), true);
        assert!(back.get("httpOnly").is_none());
    }

    #[test]
    fn test_cookie_camel_case_field_names() {
        let mut cookie = BrowserCookie::new("a", "b");
        cookie.http_only = Some(true);
        cookie.same_site = Some("Lax".to_string());
        let json = serde_json::to_value(&cookie).unwrap();
        assert_eq!(json.get("httpOnly").unwrap(), true);
        assert_eq!(json.get("sameSite").unwrap(), "Lax");
    }
}
