//! Content-addressed block identity
//!
//! A [`ContentHash`] is derived from a block's canonical serialization with
//! volatile line metadata stripped out. It is a *content* identity, not an
//! object identity:
//!
//! - Two blocks with the same serialized form share a hash, wherever they sit.
//! - A block that moves is indistinguishable from a different block with
//!   equal content.
//! - Collisions are possible and accepted; nothing detects them.
//!
//! On the wire the hash travels as the decimal string of its `u32` value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algo::{HashAlgorithm, StableHasher, murmur3_32};

// =============================================================================
// ContentHash
// =============================================================================

/// Fixed-width (32-bit) identity of one top-level block
///
/// # Memory Layout
///
/// - 4 bytes, `Copy`, no heap allocation
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[must_use]
pub struct ContentHash(u32);

impl ContentHash {
    /// Create a ContentHash from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 representation
    #[inline]
    pub const fn as_raw(&self) -> u32 {
        self.0
    }

    /// Hash a serialized block with the given algorithm
    pub fn of(serialized: &str, algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Murmur3 => Self(murmur3_32(serialized.as_bytes(), 0)),
            HashAlgorithm::Blake3 => Self(StableHasher::new().update_str(serialized).finish_u32()),
        }
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:08x})", self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentHash {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self)
    }
}

impl TryFrom<String> for ContentHash {
    type Error = std::num::ParseIntError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
