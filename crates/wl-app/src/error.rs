//! Error types for the wl-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the core crates' errors behind one
/// interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read dataset file: {path}")]
    DatasetFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Hierarchy error: {0}")]
    Hierarchy(String),

    #[error("Month not found: {0}")]
    MonthNotFound(String),

    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for wl-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<wl_store::StoreError> for AppError {
    fn from(err: wl_store::StoreError) -> Self {
        AppError::Dataset(err.to_string())
    }
}

impl From<wl_hierarchy::HierarchyError> for AppError {
    fn from(err: wl_hierarchy::HierarchyError) -> Self {
        AppError::Hierarchy(err.to_string())
    }
}

impl From<wl_core::WlError> for AppError {
    fn from(err: wl_core::WlError) -> Self {
        AppError::Backend {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
