//! Fixed-length fingerprint produced by the difference hasher.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Packed hash bits, most significant bit first, row-major.
///
/// Two images land in the same bucket only when their fingerprints are
/// byte-for-byte equal, so `Eq`, `Hash` and `Ord` all work on the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint {
    bytes: Vec<u8>,
}

impl Fingerprint {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Pack booleans into bytes, 8 per byte, first bool in the high bit.
    /// A trailing partial byte is padded with zero bits.
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut bytes = Vec::new();
        let mut current: u8 = 0;
        let mut position = 0;

        for bit in bits {
            if bit {
                current |= 1 << (7 - position);
            }
            position += 1;
            if position == 8 {
                bytes.push(current);
                current = 0;
                position = 0;
            }
        }
        if position > 0 {
            bytes.push(current);
        }

        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hexadecimal rendering
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
