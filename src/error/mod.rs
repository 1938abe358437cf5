//! # Error Module
//!
//! Error types for the duplicate image remover.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, values, what went wrong
//! - **Per-item failures are recoverable** - decode and delete errors are
//!   collected and reported, configuration errors stop the run up front

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DuplicateFinderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Deletion error: {0}")]
    Delete(#[from] DeleteError),

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("number of hash bits must be a non-zero perfect square, got {bits}")]
    HashBits { bits: u32 },

    #[error("SSIM window size must be odd, at least 3 and smaller than the {canvas}px canvas, got {window}")]
    WindowSize { window: u32, canvas: u32 },

    #[error("SSIM constant {name} must be finite and greater than zero, got {value}")]
    StabilityConstant { name: &'static str, value: f64 },

    #[error("similarity threshold must be a finite number, got {value}")]
    Threshold { value: f64 },
}

/// Errors that occur while discovering images
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while decoding or hashing an image
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Invalid image: {path} ({reason})")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Failed to resize image: {0}")]
    Resize(String),
}

impl HashError {
    /// Attach a path to an error raised before the path was known
    pub fn at(self, path: &std::path::Path) -> Self {
        match self {
            HashError::Resize(reason) => HashError::DecodeError {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        }
    }
}

/// A duplicate that could not be removed
#[derive(Error, Debug)]
#[error("Failed to delete {path}: {source}")]
pub struct DeleteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DuplicateFinderError>;
