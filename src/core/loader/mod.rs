//! # Loader Module
//!
//! Decodes a candidate file into an [`ImageRecord`]: its fingerprint and
//! its pixel count. A file that fails to decode produces no record; the
//! caller logs it and moves on.

use crate::core::hasher::{decode, DifferenceHasher, Fingerprint};
use crate::error::HashError;
use image::GenericImageView;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A successfully loaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
    /// width x height of the decoded image; only used for ordering
    pub pixel_count: u64,
}

/// Produces image records with a fixed hasher
#[derive(Debug, Clone)]
pub struct RecordLoader {
    hasher: DifferenceHasher,
}

impl RecordLoader {
    pub fn new(hasher: DifferenceHasher) -> Self {
        Self { hasher }
    }

    /// Decode `path`, fingerprint it and measure it
    pub fn load(&self, path: &Path) -> Result<ImageRecord, HashError> {
        let image = decode(path)?;
        let fingerprint = self.hasher.hash_image(&image).map_err(|e| e.at(path))?;
        let (width, height) = image.dimensions();

        Ok(ImageRecord {
            path: path.to_path_buf(),
            fingerprint,
            pixel_count: u64::from(width) * u64::from(height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn loader() -> RecordLoader {
        RecordLoader::new(DifferenceHasher::new(DifferenceHasher::DEDUP_BITS).unwrap())
    }

    fn write_gradient(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        ImageBuffer::from_fn(width, height, |x, _| {
            let v = (x * 255 / (width - 1)) as u8;
            Rgb([v, v, v])
        })
        .save(&path)
        .unwrap();
        path
    }

    #[test]
    fn record_has_dimensions_and_short_fingerprint() {
        let dir = TempDir::new().unwrap();
        let path = write_gradient(&dir, "wide.png", 120, 40);

        let record = loader().load(&path).unwrap();

        assert_eq!(record.path, path);
        assert_eq!(record.pixel_count, 120 * 40);
        assert_eq!(record.fingerprint.as_bytes().len(), 2);
    }

    #[test]
    fn rescaled_copies_share_a_fingerprint() {
        let dir = TempDir::new().unwrap();
        let large = write_gradient(&dir, "large.png", 200, 200);
        let small = write_gradient(&dir, "small.png", 100, 100);

        let loader = loader();
        assert_eq!(
            loader.load(&large).unwrap().fingerprint,
            loader.load(&small).unwrap().fingerprint
        );
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, "plain text").unwrap();

        let error = loader().load(&path).unwrap_err();
        assert!(error.to_string().contains("notes.png"));
    }
}
