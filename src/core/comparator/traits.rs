//! Seams between the deduplicator and the similarity measure.

use crate::error::{ConfigError, HashError};
use std::path::Path;

/// Scores how alike two images are.
///
/// Scoring is split in two so a bucket can decode and preprocess each
/// member once, then compare the prepared forms as often as needed.
pub trait SimilarityScorer: Send + Sync {
    /// Decoded, preprocessed form of one image
    type Prepared: Send;

    /// Decode and preprocess the image at `path`
    fn prepare(&self, path: &Path) -> Result<Self::Prepared, HashError>;

    /// Similarity of two prepared images; higher means more alike
    fn compare(&self, a: &Self::Prepared, b: &Self::Prepared) -> f64;
}

/// Score above which a later image counts as a duplicate of an earlier one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicateThreshold(f64);

impl DuplicateThreshold {
    pub const DEFAULT: f64 = 0.9;

    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::Threshold { value });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Strictly greater than the threshold; a NaN score never matches
    pub fn is_duplicate(&self, score: f64) -> bool {
        score > self.0
    }
}

impl Default for DuplicateThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        let threshold = DuplicateThreshold::new(0.9).unwrap();

        assert!(threshold.is_duplicate(0.95));
        assert!(!threshold.is_duplicate(0.9));
        assert!(!threshold.is_duplicate(0.5));
        assert!(!threshold.is_duplicate(f64::NAN));
    }

    #[test]
    fn default_is_point_nine() {
        assert_eq!(DuplicateThreshold::default().value(), 0.9);
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        assert!(DuplicateThreshold::new(f64::NAN).is_err());
        assert!(DuplicateThreshold::new(f64::INFINITY).is_err());
        assert!(DuplicateThreshold::new(-0.2).is_ok());
    }
}
