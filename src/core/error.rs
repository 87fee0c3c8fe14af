use thiserror::Error;

use crate::cookies::CacheError;
use crate::executor::ExecutorError;
use crate::infrastructure::browser::BrowserError;
use crate::services::auth_gate::GateError;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Application-level Result alias
pub type AppResult<T> = Result<T, AppError>;
