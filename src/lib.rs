//! # imgtools
//!
//! Finds near-duplicate images in a directory and removes the redundant
//! copies, keeping the largest image of each duplicate group.
//!
//! ## How duplicates are found
//! 1. Every candidate image gets a coarse difference hash (dHash)
//! 2. Images with identical hashes share a bucket, largest first
//! 3. Inside a bucket, images are compared pairwise with SSIM
//! 4. Anything scoring above the threshold against an earlier image is a duplicate
//!
//! ## Architecture
//! - `core` - The detection engine (hashing, SSIM, grouping, scheduling, deletion)
//! - `events` - Event-driven progress reporting
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DuplicateFinderError, Result};

/// Initialize tracing for the library
///
/// `default_level` is used when `RUST_LOG` is not set.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
