//! Difference Hash (dHash) implementation.
//!
//! dHash works by:
//! 1. Converting to grayscale and resizing to (width+1) x width
//! 2. Comparing each pixel to the one on its right
//! 3. Setting the bit when the left pixel is brighter
//!
//! The extra column exists because a row of `width + 1` samples yields
//! exactly `width` adjacent differences.

use super::decode::decode;
use super::fast_resize::resize_to_grayscale;
use super::Fingerprint;
use crate::error::{ConfigError, HashError};
use image::DynamicImage;
use std::path::Path;

/// Difference Hash (dHash) implementation
#[derive(Debug, Clone)]
pub struct DifferenceHasher {
    bits: u32,
    /// Side of the comparison grid, `sqrt(bits)`
    width: u32,
}

impl DifferenceHasher {
    /// Bits used by the single-image `hash` front-end
    pub const DEFAULT_BITS: u32 = 64;

    /// Bits used when bucketing for duplicate removal; SSIM does the fine work
    pub const DEDUP_BITS: u32 = 16;

    /// Create a hasher producing `bits` bits.
    ///
    /// `bits` must be a non-zero perfect square.
    pub fn new(bits: u32) -> Result<Self, ConfigError> {
        let width = square_side(bits).ok_or(ConfigError::HashBits { bits })?;
        Ok(Self { bits, width })
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Compute the fingerprint of an already-decoded image
    pub fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        let gray = resize_to_grayscale(image, self.width + 1, self.width)?;

        let bits = (0..self.width).flat_map(|y| {
            let gray = &gray;
            (0..self.width).map(move |x| gray.get_pixel(x, y)[0] > gray.get_pixel(x + 1, y)[0])
        });

        Ok(Fingerprint::from_bits(bits))
    }

    /// Decode `path` and compute its fingerprint
    pub fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let image = decode(path)?;
        self.hash_image(&image).map_err(|e| e.at(path))
    }
}

fn square_side(bits: u32) -> Option<u32> {
    if bits == 0 {
        return None;
    }
    let side = (bits as f64).sqrt().round() as u32;
    (side.checked_mul(side) == Some(bits)).then_some(side)
}
