//! Algorithm implementations for block sync.
//!
//! - `hash`: MurmurHash3 and blake3-based stable hashing
//! - `edit`: unit-cost edit-distance DP with update > insert > delete tie-break
//! - `diff`: snapshot diff producing wire-ready edit scripts

mod diff;
mod edit;
mod hash;

pub use diff::{
    DiffConfig, DiffResult, DiffStats, EditOperation, EditScript, diff, diff_with_config,
};
pub use edit::{Edit, EditKind, edit_distance, edit_script};
pub use hash::{HashAlgorithm, StableHasher, murmur3_32};
