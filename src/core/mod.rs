//! # Core Module
//!
//! The UI-agnostic duplicate removal engine.
//!
//! ## Modules
//! - `scanner` - Discovers candidate images in a directory
//! - `hasher` - Computes difference-hash fingerprints
//! - `similarity` - Scores image pairs with SSIM
//! - `loader` - Turns a file into a fingerprinted record
//! - `comparator` - Buckets records and finds duplicates
//! - `pipeline` - Orchestrates the full workflow
//! - `planner` - Previews and deletes duplicates

pub mod comparator;
pub mod hasher;
pub mod loader;
pub mod pipeline;
pub mod planner;
pub mod scanner;
pub mod similarity;

// Re-export commonly used types
pub use comparator::{DuplicateMap, DuplicateThreshold, SimilarityScorer};
pub use hasher::{DifferenceHasher, Fingerprint};
pub use loader::ImageRecord;
pub use pipeline::{Pipeline, PipelineOutcome, PipelineResult};
pub use planner::{DeletionOutcome, DeletionPlanner, DeletionReport};
pub use similarity::{SsimConfig, SsimScorer};
