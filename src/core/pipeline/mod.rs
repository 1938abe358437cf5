//! # Pipeline Module
//!
//! Orchestrates the full duplicate removal workflow.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Discover candidate images under one directory
//! 2. **Load** - Decode and fingerprint every candidate (parallel)
//! 3. **Group** - Bucket records by identical fingerprint
//! 4. **Deduplicate** - Pairwise SSIM inside each bucket (parallel)
//!
//! ## Parallelism
//! Each parallel stage gets its own rayon pool, dropped when the stage
//! returns. Loading finishes completely before deduplication starts.

mod executor;

pub use executor::{
    Pipeline, PipelineBuilder, PipelineConfig, PipelineOutcome, PipelineResult, DEFAULT_WORKERS,
    MAX_WORKERS,
};
