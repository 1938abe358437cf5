//! Pipeline execution implementation.

use crate::core::comparator::{
    DedupOutcome, DuplicateMap, DuplicateThreshold, HashBucket, HashBucketGrouper,
    PairwiseDeduplicator,
};
use crate::core::hasher::DifferenceHasher;
use crate::core::loader::{ImageRecord, RecordLoader};
use crate::core::scanner::{ScanConfig, WalkDirScanner};
use crate::core::similarity::{SsimConfig, SsimScorer};
use crate::error::{DuplicateFinderError, HashError};
use crate::events::{
    null_sender, DedupEvent, DedupProgress, Event, EventSender, LoadEvent, LoadProgress,
    PipelineEvent, PipelinePhase, PipelineSummary,
};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

/// Upper bound on worker threads per phase
pub const MAX_WORKERS: usize = 8;

/// Worker count used when none is given
pub const DEFAULT_WORKERS: usize = 4;

/// Result of a completed run
#[derive(Debug, Default)]
pub struct PipelineResult {
    /// Every duplicate found, mapped to the image it duplicates
    pub duplicates: DuplicateMap,
    /// Candidate files found by the scan
    pub total_images: usize,
    /// Candidates that decoded and were fingerprinted
    pub loaded_images: usize,
    /// Buckets with at least two members
    pub buckets_compared: usize,
    /// Sum of the pairwise budgets of the compared buckets
    pub comparisons: usize,
    /// Non-fatal problems (unreadable entries, undecodable images)
    pub errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// How a run ended
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Fewer than two candidates; nothing was loaded or compared
    InsufficientInput { found: usize },
    Completed(PipelineResult),
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory to scan
    pub root: PathBuf,
    pub recursive: bool,
    /// Threads per phase; 0 runs each phase on the calling thread
    pub workers: usize,
    /// Fingerprint length used for bucketing
    pub hash_bits: u32,
    /// SSIM score a duplicate must exceed
    pub threshold: f64,
    pub ssim: SsimConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            recursive: false,
            workers: DEFAULT_WORKERS,
            hash_bits: DifferenceHasher::DEDUP_BITS,
            threshold: DuplicateThreshold::DEFAULT,
            ssim: SsimConfig::default(),
        }
    }
}

/// Builder for pipeline configuration
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory to scan
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Descend into subdirectories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.recursive = recursive;
        self
    }

    /// Set the worker count, clamped to [`MAX_WORKERS`]
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers.min(MAX_WORKERS);
        self
    }

    /// Set the fingerprint length in bits
    pub fn hash_bits(mut self, bits: u32) -> Self {
        self.config.hash_bits = bits;
        self
    }

    /// Set the duplicate threshold
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Override SSIM parameters
    pub fn ssim(mut self, ssim: SsimConfig) -> Self {
        self.config.ssim = ssim;
        self
    }

    /// Validate the configuration and build the pipeline
    pub fn build(self) -> Result<Pipeline, DuplicateFinderError> {
        let config = self.config;
        let hasher = DifferenceHasher::new(config.hash_bits)?;
        let scorer = SsimScorer::new(config.ssim)?;
        let threshold = DuplicateThreshold::new(config.threshold)?;

        Ok(Pipeline {
            loader: RecordLoader::new(hasher),
            scorer,
            threshold,
            config,
        })
    }
}

/// The duplicate removal pipeline: scan, load, group, deduplicate
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    loader: RecordLoader,
    scorer: SsimScorer,
    threshold: DuplicateThreshold,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineOutcome, DuplicateFinderError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(
        &self,
        events: &EventSender,
    ) -> Result<PipelineOutcome, DuplicateFinderError> {
        let start_time = Instant::now();
        let mut errors = Vec::new();

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 0: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = WalkDirScanner::new(ScanConfig {
            recursive: self.config.recursive,
            ..ScanConfig::default()
        });
        let scan_result = scanner.scan_with_events(&self.config.root, events)?;
        errors.extend(scan_result.errors.iter().map(ToString::to_string));

        let candidates = scan_result.images;
        let total_images = candidates.len();
        if total_images < 2 {
            warn!(
                root = %self.config.root.display(),
                found = total_images,
                "need at least two images to look for duplicates"
            );
            events.send(Event::Pipeline(PipelineEvent::InsufficientInput {
                found: total_images,
            }));
            return Ok(PipelineOutcome::InsufficientInput {
                found: total_images,
            });
        }

        // Phase 1: decode and fingerprint every candidate
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Loading,
        }));
        let records = self.load_records(&candidates, &mut errors, events)?;
        let loaded_images = records.len();

        let buckets: Vec<HashBucket> = HashBucketGrouper::new()
            .group(records)
            .into_values()
            .filter(|bucket| bucket.len() >= 2)
            .collect();
        let total_comparisons: usize = buckets.iter().map(HashBucket::comparison_budget).sum();
        debug!(
            buckets = buckets.len(),
            comparisons = total_comparisons,
            "grouped images by fingerprint"
        );

        // Phase 2: pairwise SSIM inside each bucket
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Deduplicating,
        }));
        let duplicates = self.deduplicate(&buckets, total_comparisons, events)?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_images,
                loaded_images,
                buckets_compared: buckets.len(),
                duplicate_count: duplicates.len(),
                duration_ms,
            },
        }));

        Ok(PipelineOutcome::Completed(PipelineResult {
            duplicates,
            total_images,
            loaded_images,
            buckets_compared: buckets.len(),
            comparisons: total_comparisons,
            errors,
            duration_ms,
        }))
    }

    fn load_records(
        &self,
        candidates: &[PathBuf],
        errors: &mut Vec<String>,
        events: &EventSender,
    ) -> Result<Vec<ImageRecord>, DuplicateFinderError> {
        let total = candidates.len();
        events.send(Event::Load(LoadEvent::Started { total_files: total }));

        let loaded: Vec<Result<ImageRecord, HashError>> =
            run_phase(self.config.workers, candidates, |path| {
                let result = self.loader.load(path);
                events.send(Event::Load(LoadEvent::Progress(LoadProgress {
                    current_path: path.clone(),
                })));
                result
            })?;

        let mut records = Vec::with_capacity(loaded.len());
        for result in loaded {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("{}", e);
                    let path = match &e {
                        HashError::DecodeError { path, .. } => path.clone(),
                        HashError::Resize(_) => PathBuf::new(),
                    };
                    events.send(Event::Load(LoadEvent::Failed {
                        path,
                        message: e.to_string(),
                    }));
                    errors.push(e.to_string());
                }
            }
        }

        events.send(Event::Load(LoadEvent::Completed {
            loaded: records.len(),
            failed: total - records.len(),
        }));
        debug!(loaded = records.len(), total, "loading complete");

        Ok(records)
    }

    fn deduplicate(
        &self,
        buckets: &[HashBucket],
        total_comparisons: usize,
        events: &EventSender,
    ) -> Result<DuplicateMap, DuplicateFinderError> {
        events.send(Event::Dedup(DedupEvent::Started {
            buckets: buckets.len(),
            total_comparisons,
        }));

        let deduplicator = PairwiseDeduplicator::new(&self.scorer, self.threshold);
        let fragments: Vec<DedupOutcome> = run_phase(self.config.workers, buckets, |bucket| {
            let outcome = deduplicator.deduplicate(bucket.paths());
            events.send(Event::Dedup(DedupEvent::Progress(DedupProgress {
                comparisons: outcome.comparisons,
            })));
            outcome
        })?;

        let mut duplicates = DuplicateMap::new();
        for fragment in fragments {
            duplicates.merge(fragment.duplicates);
        }

        events.send(Event::Dedup(DedupEvent::Completed {
            duplicates: duplicates.len(),
        }));
        debug!(duplicates = duplicates.len(), "deduplication complete");

        Ok(duplicates)
    }
}

/// Run `task` over `items` on a pool of `workers` threads.
///
/// The pool lives only for the duration of the call. With zero workers the
/// items are processed in order on the calling thread.
fn run_phase<T, R, F>(workers: usize, items: &[T], task: F) -> Result<Vec<R>, DuplicateFinderError>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if workers == 0 {
        return Ok(items.iter().map(&task).collect());
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("imgtools-worker-{}", index))
        .build()?;
    Ok(pool.install(|| items.par_iter().map(&task).collect()))
}
