//! SIMD-accelerated bicubic resizing to 8-bit grayscale.
//!
//! Both the difference hash and the SSIM canvas start from the same step:
//! luma conversion followed by a Catmull-Rom (bicubic) resize. The U8
//! convolution in fast_image_resize is fixed-point, so results do not
//! depend on which SIMD path the CPU takes.

use crate::error::HashError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage};

/// Reusable resizer; keeps its scratch buffers between calls
pub struct FastResizer {
    resizer: Resizer,
    options: ResizeOptions,
}

impl FastResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            options: ResizeOptions::new()
                .resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom)),
        }
    }

    /// Convert to 8-bit luma, then resize to exactly `width` x `height`.
    pub fn resize_to_grayscale(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, HashError> {
        let gray = image.to_luma8();
        let (src_width, src_height) = gray.dimensions();

        if src_width == 0 || src_height == 0 {
            return Err(HashError::Resize(format!(
                "source image is {}x{}",
                src_width, src_height
            )));
        }
        if width == 0 || height == 0 {
            return Err(HashError::Resize(format!(
                "cannot resize to {}x{}",
                width, height
            )));
        }

        let src_image = Image::from_vec_u8(src_width, src_height, gray.into_raw(), PixelType::U8)
            .map_err(|e| HashError::Resize(format!("source buffer rejected: {}", e)))?;
        let mut dst_image = Image::new(width, height, PixelType::U8);

        self.resizer
            .resize(&src_image, &mut dst_image, &self.options)
            .map_err(|e| HashError::Resize(e.to_string()))?;

        GrayImage::from_raw(width, height, dst_image.into_vec())
            .ok_or_else(|| HashError::Resize("destination buffer has wrong length".to_string()))
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function for one-off resizing
pub fn resize_to_grayscale(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<GrayImage, HashError> {
    FastResizer::new().resize_to_grayscale(image, width, height)
}
