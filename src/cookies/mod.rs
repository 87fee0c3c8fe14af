use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::infrastructure::browser::BrowserCookie;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid URL '{url}': no host to derive a cookie domain from")]
    InvalidUrl { url: String },

    #[error("Corrupt cookie cache at {path}: {source}")]
    CorruptCache {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Cookie storage unavailable: {0}")]
    StorageUnavailable(#[from] std::io::Error),
}

/// Durable per-domain cookie storage.
///
/// One JSON file per normalized domain under `root`, named
/// `{domain}_cookies.json`. Saves replace the file wholesale via a temp file
/// and rename, so a reader only ever sees a complete prior value or nothing.
pub struct CookieCache {
    root: PathBuf,
    fixed_file: Option<String>,
}

impl CookieCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fixed_file: None,
        }
    }

    /// Pin every load/save to a single filename instead of deriving one per
    /// domain (COOKIES_FILE override).
    pub fn with_fixed_file(root: impl Into<PathBuf>, file_name: String) -> Self {
        Self {
            root: root.into(),
            fixed_file: Some(file_name),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root. Idempotent, called once at startup and again
    /// before every write.
    pub async fn ensure_root(&self) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Host component of `url`, lower-cased, port stripped.
    pub fn domain_of(url: &str) -> Result<String, CacheError> {
        let parsed = Url::parse(url).map_err(|_| CacheError::InvalidUrl {
            url: url.to_string(),
        })?;
        match parsed.host_str() {
            Some(host) => Ok(host.to_ascii_lowercase()),
            None => Err(CacheError::InvalidUrl {
                url: url.to_string(),
            }),
        }
    }

    /// Deterministic cookie file path for the domain of `url`.
    pub fn resolve_path(&self, url: &str) -> Result<PathBuf, CacheError> {
        if let Some(ref name) = self.fixed_file {
            return Ok(self.root.join(name));
        }
        let domain = Self::domain_of(url)?;
        Ok(self.root.join(format!("{domain}_cookies.json")))
    }

    /// Cookies previously saved for the domain of `url`.
    ///
    /// `Ok(None)` means no prior session for this domain. A file that exists
    /// but is not a JSON array of cookie records is surfaced as
    /// [`CacheError::CorruptCache`] rather than treated as empty.
    pub async fn load(&self, url: &str) -> Result<Option<Vec<BrowserCookie>>, CacheError> {
        let path = self.resolve_path(url)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::StorageUnavailable(e)),
        };

        let cookies: Vec<BrowserCookie> = serde_json::from_slice(&bytes)
            .map_err(|source| CacheError::CorruptCache { path: path.clone(), source })?;

        debug!("Loaded {} cookies from {:?}", cookies.len(), path);
        Ok(Some(cookies))
    }

    /// Persist the full cookie set for the domain of `url`, replacing any
    /// prior file. The write goes to a temp file in the same directory and is
    /// renamed into place, so an abandoned save never leaves a torn file.
    pub async fn save(&self, url: &str, cookies: &[BrowserCookie]) -> Result<(), CacheError> {
        let path = self.resolve_path(url)?;
        self.ensure_root().await?;

        let body = serde_json::to_vec(cookies).map_err(|source| CacheError::CorruptCache {
            path: path.clone(),
            source,
        })?;

        let tmp = path.with_extension(format!("json.tmp.{}", std::process::id()));
        tokio::fs::write(&tmp, &body).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            warn!("Abandoning cookie save for {:?}: {}", path, e);
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CacheError::StorageUnavailable(e));
        }

        debug!("Saved {} cookies to {:?}", cookies.len(), path);
        Ok(())
    }
}
