//! Greedy pairwise deduplication inside one hash bucket.

use super::{comparison_budget, DuplicateMap, DuplicateThreshold, SimilarityScorer};
use std::path::PathBuf;
use tracing::{trace, warn};

/// Result of deduplicating one bucket
#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    /// Duplicates found in this bucket, each mapped to its anchor
    pub duplicates: DuplicateMap,
    /// Comparison budget of the bucket, n(n-1)/2
    pub comparisons: usize,
}

/// Lazily prepared bucket member
enum Slot<P> {
    Pending,
    Ready(P),
    /// Could not be decoded, or no longer needed
    Unavailable,
}

/// Runs the anchor-and-skip scan over an ordered bucket
pub struct PairwiseDeduplicator<'a, S: SimilarityScorer> {
    scorer: &'a S,
    threshold: DuplicateThreshold,
}

impl<'a, S: SimilarityScorer> PairwiseDeduplicator<'a, S> {
    pub fn new(scorer: &'a S, threshold: DuplicateThreshold) -> Self {
        Self { scorer, threshold }
    }

    /// Find duplicates in `bucket`, which must already be ordered with the
    /// preferred original first.
    ///
    /// Each image is decoded at most once. An image that fails to decode
    /// is logged and never matches anything.
    pub fn deduplicate(&self, bucket: &[PathBuf]) -> DedupOutcome {
        let mut duplicates = DuplicateMap::new();
        let mut slots: Vec<Slot<S::Prepared>> = bucket.iter().map(|_| Slot::Pending).collect();

        for anchor in 0..bucket.len() {
            if duplicates.is_duplicate(&bucket[anchor]) {
                continue;
            }
            if !self.ensure_prepared(&mut slots, bucket, anchor) {
                continue;
            }

            for candidate in anchor + 1..bucket.len() {
                if duplicates.is_duplicate(&bucket[candidate]) {
                    continue;
                }
                if !self.ensure_prepared(&mut slots, bucket, candidate) {
                    continue;
                }

                let (Slot::Ready(a), Slot::Ready(b)) = (&slots[anchor], &slots[candidate]) else {
                    continue;
                };
                let score = self.scorer.compare(a, b);
                trace!(
                    anchor = %bucket[anchor].display(),
                    candidate = %bucket[candidate].display(),
                    score,
                    "compared"
                );

                if self.threshold.is_duplicate(score) {
                    duplicates.insert(bucket[candidate].clone(), bucket[anchor].clone());
                    // Flagged images are never compared again
                    slots[candidate] = Slot::Unavailable;
                }
            }

            // Later anchors only look forward, so this one is done
            slots[anchor] = Slot::Unavailable;
        }

        DedupOutcome {
            duplicates,
            comparisons: comparison_budget(bucket.len()),
        }
    }

    fn ensure_prepared(
        &self,
        slots: &mut [Slot<S::Prepared>],
        bucket: &[PathBuf],
        index: usize,
    ) -> bool {
        if let Slot::Pending = slots[index] {
            slots[index] = match self.scorer.prepare(&bucket[index]) {
                Ok(prepared) => Slot::Ready(prepared),
                Err(e) => {
                    warn!("{}", e);
                    Slot::Unavailable
                }
            };
        }
        matches!(slots[index], Slot::Ready(_))
    }
}
