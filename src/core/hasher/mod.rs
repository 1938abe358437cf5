//! # Hasher Module
//!
//! Computes difference hashes (dHash) used to bucket candidate duplicates.
//!
//! ## How It Works
//! 1. Convert to grayscale
//! 2. Resize with a bicubic kernel to (width+1) x width
//! 3. Compare horizontally adjacent pixels
//! 4. Pack the comparison bits into a byte string
//!
//! ## Example
//! ```rust,ignore
//! use imgtools::core::hasher::DifferenceHasher;
//!
//! let hasher = DifferenceHasher::new(64)?;
//! let fingerprint = hasher.hash_file(&path)?;
//! println!("{}  {}", fingerprint, path.display());
//! ```

mod decode;
mod difference;
pub mod fast_resize;
mod fingerprint;

pub use decode::decode;
pub use difference::DifferenceHasher;
pub use fingerprint::Fingerprint;
