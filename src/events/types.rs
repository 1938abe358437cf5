//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the duplicate removal pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Discovery of candidate files
    Scan(ScanEvent),
    /// Phase 1: decoding and fingerprinting
    Load(LoadEvent),
    /// Phase 2: pairwise SSIM inside buckets
    Dedup(DedupEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Discovery has started
    Started { root: PathBuf },
    /// An entry could not be read; discovery continues
    Error { path: PathBuf, message: String },
    /// Discovery completed
    Completed { total_images: usize },
}

/// Events during the load phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoadEvent {
    /// Loading has started
    Started { total_files: usize },
    /// One more file has been processed (loaded or rejected)
    Progress(LoadProgress),
    /// A file could not be decoded and was skipped
    Failed { path: PathBuf, message: String },
    /// Loading completed
    Completed { loaded: usize, failed: usize },
}

/// One file has been processed.
///
/// Workers finish in any order, so each event counts a single file;
/// subscribers accumulate them against `LoadEvent::Started::total_files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadProgress {
    /// File that was just processed
    pub current_path: PathBuf,
}

/// Events during the deduplication phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DedupEvent {
    /// Deduplication has started
    Started {
        /// Buckets with at least two members
        buckets: usize,
        /// Sum of the comparison budgets of those buckets
        total_comparisons: usize,
    },
    /// A bucket has been fully processed
    Progress(DedupProgress),
    /// Deduplication completed
    Completed { duplicates: usize },
}

/// Comparisons accounted for by one finished bucket.
///
/// An increment, not a running total; the sum over all events equals
/// `DedupEvent::Started::total_comparisons`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupProgress {
    /// Comparison budget of the bucket that just finished
    pub comparisons: usize,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Fewer than two candidate images; nothing to do
    InsufficientInput { found: usize },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Loading,
    Deduplicating,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Candidate files found
    pub total_images: usize,
    /// Files that decoded successfully
    pub loaded_images: usize,
    /// Buckets that needed pairwise comparison
    pub buckets_compared: usize,
    /// Duplicates found
    pub duplicate_count: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Loading => write!(f, "Loading"),
            PipelinePhase::Deduplicating => write!(f, "Processing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Dedup(DedupEvent::Progress(DedupProgress { comparisons: 6 }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Dedup(DedupEvent::Progress(p)) => assert_eq!(p.comparisons, 6),
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn load_failure_keeps_path() {
        let event = Event::Load(LoadEvent::Failed {
            path: PathBuf::from("/photos/broken.png"),
            message: "bad header".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("/photos/broken.png"));
    }

    #[test]
    fn dedup_phase_displays_as_processing() {
        assert_eq!(PipelinePhase::Deduplicating.to_string(), "Processing");
        assert_eq!(PipelinePhase::Loading.to_string(), "Loading");
    }
}
