//! # Scanner Module
//!
//! Discovers candidate image files in a directory.
//!
//! ## Accepted files
//! Regular, non-hidden files with one of these extensions (any case):
//! `jpg`, `jpeg`, `png`, `webp`.
//!
//! ## Example
//! ```rust,ignore
//! use imgtools::core::scanner::{ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig { recursive: true, ..Default::default() });
//! let result = scanner.scan(Path::new("/photos"))?;
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use std::path::PathBuf;

/// Result of a scan operation
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Candidate images, sorted by path
    pub images: Vec<PathBuf>,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}
