//! Buckets images by exact fingerprint equality.
//!
//! Approximate matching is left to SSIM, which only ever runs inside a
//! bucket; that keeps the quadratic comparison cost bounded by bucket size.

use crate::core::hasher::Fingerprint;
use crate::core::loader::ImageRecord;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Paths sharing one fingerprint, largest image first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashBucket {
    paths: Vec<PathBuf>,
}

impl HashBucket {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Pairs this bucket implies; zero for singletons
    pub fn comparison_budget(&self) -> usize {
        super::comparison_budget(self.paths.len())
    }
}

/// Groups image records into ordered hash buckets
#[derive(Debug, Default)]
pub struct HashBucketGrouper;

impl HashBucketGrouper {
    pub fn new() -> Self {
        Self
    }

    /// Partition `records` by fingerprint.
    ///
    /// Each bucket is sorted by pixel count descending, then path
    /// ascending, so the first member is the one that will be kept.
    /// Input order does not affect the result.
    pub fn group<I>(&self, records: I) -> BTreeMap<Fingerprint, HashBucket>
    where
        I: IntoIterator<Item = ImageRecord>,
    {
        let mut staged: BTreeMap<Fingerprint, Vec<(u64, PathBuf)>> = BTreeMap::new();
        for record in records {
            staged
                .entry(record.fingerprint)
                .or_default()
                .push((record.pixel_count, record.path));
        }

        staged
            .into_iter()
            .map(|(fingerprint, mut members)| {
                members.sort_by(|(size_a, path_a), (size_b, path_b)| {
                    (Reverse(size_a), path_a).cmp(&(Reverse(size_b), path_b))
                });
                let paths = members.into_iter().map(|(_, path)| path).collect();
                (fingerprint, HashBucket { paths })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, fingerprint: &[u8], pixel_count: u64) -> ImageRecord {
        ImageRecord {
            path: PathBuf::from(path),
            fingerprint: Fingerprint::new(fingerprint.to_vec()),
            pixel_count,
        }
    }

    #[test]
    fn empty_input_returns_no_buckets() {
        assert!(HashBucketGrouper::new().group(Vec::new()).is_empty());
    }

    #[test]
    fn groups_by_fingerprint_largest_first() {
        let h = [0xAB, 0xCD];
        let g = [0x12, 0x34];
        let buckets = HashBucketGrouper::new().group(vec![
            record("/p1.png", &h, 10),
            record("/p2.png", &h, 30),
            record("/p3.png", &g, 5),
        ]);

        assert_eq!(buckets.len(), 2);
        let bucket_h = &buckets[&Fingerprint::new(h.to_vec())];
        assert_eq!(
            bucket_h.paths(),
            &[PathBuf::from("/p2.png"), PathBuf::from("/p1.png")]
        );
        assert_eq!(buckets[&Fingerprint::new(g.to_vec())].len(), 1);
    }

    #[test]
    fn equal_sizes_fall_back_to_path_order() {
        let fp = [0x00];
        let buckets = HashBucketGrouper::new().group(vec![
            record("/photos/c.png", &fp, 100),
            record("/photos/a.png", &fp, 100),
            record("/photos/big.png", &fp, 400),
            record("/photos/b.png", &fp, 100),
        ]);

        let order: Vec<_> = buckets[&Fingerprint::new(fp.to_vec())]
            .paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(order, vec!["big.png", "a.png", "b.png", "c.png"]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let fp = [0x7F];
        let forward = vec![
            record("/x.png", &fp, 1),
            record("/y.png", &fp, 2),
            record("/z.png", &fp, 3),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let grouper = HashBucketGrouper::new();
        assert_eq!(grouper.group(forward), grouper.group(backward));
    }

    #[test]
    fn bucket_reports_budget() {
        let fp = [0x01];
        let buckets = HashBucketGrouper::new().group(
            (0..4).map(|i| record(&format!("/{}.png", i), &fp, 1)),
        );
        assert_eq!(buckets[&Fingerprint::new(fp.to_vec())].comparison_budget(), 6);
    }
}
