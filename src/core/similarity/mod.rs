//! # Similarity Module
//!
//! Mean structural similarity (SSIM) between two images.
//!
//! Both images are reduced to the same small grayscale canvas first, so
//! images of different resolutions can be compared directly. Local
//! statistics come from a uniform window rather than a Gaussian one.
//!
//! ## Algorithm
//! 1. Grayscale, bicubic resize to `canvas_size` x `canvas_size`, scale to [0, 1]
//! 2. Box-filter x, y, x², y² and xy to get local means, variances and covariance
//! 3. Evaluate the SSIM formula per pixel
//! 4. Drop a `(window - 1) / 2` border and average the rest

mod filter;

pub use filter::box_filter;

use crate::core::comparator::SimilarityScorer;
use crate::core::hasher::{decode, fast_resize::resize_to_grayscale};
use crate::error::{ConfigError, HashError};
use image::DynamicImage;
use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Algorithm parameters for SSIM
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SsimConfig {
    /// Side of the square canvas both images are resized to
    pub canvas_size: u32,
    /// Side of the sliding window; odd
    pub window_size: u32,
    /// Luminance stabilizer, relative to a dynamic range of 1.0
    pub k1: f64,
    /// Contrast stabilizer, relative to a dynamic range of 1.0
    pub k2: f64,
}

impl Default for SsimConfig {
    fn default() -> Self {
        Self {
            canvas_size: 64,
            window_size: 7,
            k1: 0.01,
            k2: 0.03,
        }
    }
}

impl SsimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = self.window_size;
        if window < 3 || window % 2 == 0 || window >= self.canvas_size {
            return Err(ConfigError::WindowSize {
                window,
                canvas: self.canvas_size,
            });
        }
        for (name, value) in [("k1", self.k1), ("k2", self.k2)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::StabilityConstant { name, value });
            }
        }
        Ok(())
    }
}

/// An image prepared for SSIM: grayscale intensities in [0, 1]
#[derive(Debug, Clone)]
pub struct SsimCanvas {
    pixels: Array2<f64>,
}

impl SsimCanvas {
    pub fn side(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn pixels(&self) -> ArrayView2<'_, f64> {
        self.pixels.view()
    }
}

/// Computes mean SSIM with a fixed configuration
#[derive(Debug, Clone)]
pub struct SsimScorer {
    config: SsimConfig,
}

impl SsimScorer {
    pub fn new(config: SsimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SsimConfig {
        &self.config
    }

    /// Grayscale, resize to the canvas and normalize to [0, 1]
    pub fn preprocess(&self, image: &DynamicImage) -> Result<SsimCanvas, HashError> {
        let side = self.config.canvas_size;
        let gray = resize_to_grayscale(image, side, side)?;
        let pixels = Array2::from_shape_fn((side as usize, side as usize), |(y, x)| {
            f64::from(gray.get_pixel(x as u32, y as u32)[0]) / 255.0
        });

        Ok(SsimCanvas { pixels })
    }

    /// Mean SSIM of two decoded images
    pub fn similarity(&self, a: &DynamicImage, b: &DynamicImage) -> Result<f64, HashError> {
        Ok(self.compare_canvases(&self.preprocess(a)?, &self.preprocess(b)?))
    }

    /// Decode both files and return their mean SSIM
    pub fn similarity_files(&self, a: &Path, b: &Path) -> Result<f64, HashError> {
        let canvas_a = self.prepare(a)?;
        let canvas_b = self.prepare(b)?;
        Ok(self.compare_canvases(&canvas_a, &canvas_b))
    }

    /// Mean SSIM of two canvases produced by this scorer
    pub fn compare_canvases(&self, a: &SsimCanvas, b: &SsimCanvas) -> f64 {
        debug_assert_eq!(a.pixels.dim(), b.pixels.dim());
        let side = a.side();
        let window = self.config.window_size as usize;

        let samples = (window * window) as f64;
        let cov_norm = samples / (samples - 1.0);

        let x = &a.pixels;
        let y = &b.pixels;
        let ux = box_filter(x.view(), window);
        let uy = box_filter(y.view(), window);
        let uxx = box_filter((x * x).view(), window);
        let uyy = box_filter((y * y).view(), window);
        let uxy = box_filter((x * y).view(), window);

        let vx = (uxx - &ux * &ux) * cov_norm;
        let vy = (uyy - &uy * &uy) * cov_norm;
        let vxy = (uxy - &ux * &uy) * cov_norm;

        let c1 = self.config.k1.powi(2);
        let c2 = self.config.k2.powi(2);
        let numerator = (&ux * &uy * 2.0 + c1) * (vxy * 2.0 + c2);
        let denominator = (&ux * &ux + &uy * &uy + c1) * (vx + vy + c2);
        let ssim_map = numerator / denominator;

        let pad = (window - 1) / 2;
        ssim_map
            .slice(s![pad..side - pad, pad..side - pad])
            .mean()
            .unwrap_or_default()
    }
}

impl SimilarityScorer for SsimScorer {
    type Prepared = SsimCanvas;

    fn prepare(&self, path: &Path) -> Result<SsimCanvas, HashError> {
        let image = decode(path)?;
        self.preprocess(&image).map_err(|e| e.at(path))
    }

    fn compare(&self, a: &SsimCanvas, b: &SsimCanvas) -> f64 {
        self.compare_canvases(a, b)
    }
}
