//! # Comparator Module
//!
//! Turns fingerprinted images into a duplicate → original map.
//!
//! ## How It Works
//! 1. Bucket images by exact fingerprint equality, largest image first
//! 2. Inside each bucket, scan pairs greedily: the earliest image not yet
//!    flagged becomes an anchor, and every later unflagged image scoring
//!    above the threshold against it is flagged as its duplicate
//!
//! Groups are star-shaped around their anchor. If A~B and B~C but not
//! A~C, C is only ever compared with A once B has been flagged.

mod dedup;
mod grouper;
mod traits;

pub use dedup::{DedupOutcome, PairwiseDeduplicator};
pub use grouper::{HashBucket, HashBucketGrouper};
pub use traits::{DuplicateThreshold, SimilarityScorer};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Number of pairs in a bucket of `members` images: n(n-1)/2
pub fn comparison_budget(members: usize) -> usize {
    members * members.saturating_sub(1) / 2
}

/// Maps each duplicate to the image it duplicates.
///
/// Iterates in duplicate-path order so listings are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateMap {
    entries: BTreeMap<PathBuf, PathBuf>,
}

impl DuplicateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `duplicate` as a copy of `original`
    pub fn insert(&mut self, duplicate: PathBuf, original: PathBuf) {
        debug_assert_ne!(duplicate, original, "an image cannot duplicate itself");
        self.entries.insert(duplicate, original);
    }

    /// Whether `path` has already been flagged as a duplicate
    pub fn is_duplicate(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn original_of(&self, duplicate: &Path) -> Option<&Path> {
        self.entries.get(duplicate).map(PathBuf::as_path)
    }

    /// Absorb a fragment from another bucket.
    ///
    /// Buckets are disjoint, so keys never collide.
    pub fn merge(&mut self, fragment: DuplicateMap) {
        for (duplicate, original) in fragment.entries {
            debug_assert!(!self.entries.contains_key(&duplicate));
            self.entries.insert(duplicate, original);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (duplicate, original) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries
            .iter()
            .map(|(dup, orig)| (dup.as_path(), orig.as_path()))
    }

    /// Duplicate paths, in order
    pub fn duplicates(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> DuplicateMap {
        let mut dups = DuplicateMap::new();
        for (d, o) in pairs {
            dups.insert(PathBuf::from(d), PathBuf::from(o));
        }
        dups
    }

    #[test]
    fn budget_is_pair_count() {
        assert_eq!(comparison_budget(0), 0);
        assert_eq!(comparison_budget(1), 0);
        assert_eq!(comparison_budget(2), 1);
        assert_eq!(comparison_budget(3), 3);
        assert_eq!(comparison_budget(10), 45);
    }

    #[test]
    fn merge_combines_disjoint_fragments() {
        let mut global = map(&[("/b.png", "/a.png")]);
        global.merge(map(&[("/d.png", "/c.png"), ("/e.png", "/c.png")]));

        assert_eq!(global.len(), 3);
        assert_eq!(global.original_of(Path::new("/e.png")), Some(Path::new("/c.png")));
    }

    #[test]
    fn iteration_is_sorted_by_duplicate() {
        let dups = map(&[("/z.png", "/a.png"), ("/m.png", "/a.png")]);
        let order: Vec<_> = dups.duplicates().collect();
        assert_eq!(order, vec![Path::new("/m.png"), Path::new("/z.png")]);
    }

    #[test]
    fn originals_are_not_duplicates() {
        let dups = map(&[("/b.png", "/a.png")]);
        assert!(dups.is_duplicate(Path::new("/b.png")));
        assert!(!dups.is_duplicate(Path::new("/a.png")));
    }
}
