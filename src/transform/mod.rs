//! Document transforms.
//!
//! - `Indexer` - Document → BlockSnapshot (hashes, content, line metadata)

mod indexer;

pub use indexer::{BlockSnapshot, IndexConfig, IndexStats, Indexer};
