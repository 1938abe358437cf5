//! Image decoding.

use crate::error::HashError;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Decode the image at `path`.
///
/// The format is sniffed from the file contents, so a PNG saved with a
/// `.jpg` extension still decodes.
pub fn decode(path: &Path) -> Result<DynamicImage, HashError> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    reader.decode().map_err(|e| HashError::DecodeError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
