//! Indexer: Document → BlockSnapshot
//!
//! Reduces a rendered document to what the diff engine works on:
//!
//! 1. Drops whitespace-only text blocks between top-level blocks
//! 2. Extracts the line attribute from each block root into a parallel array
//! 3. Serializes each block with that attribute stripped and hashes it
//!
//! The input document is borrowed and never modified; every serialized block
//! is a fresh string.
//!
//! # Usage
//!
//! ```ignore
//! let snapshot = Indexer::new(IndexConfig::default()).index(&doc);
//! assert_eq!(snapshot.hashes.len(), snapshot.lines.len());
//! ```

use rustc_hash::FxHashMap;

use crate::algo::HashAlgorithm;
use crate::attr::AttrsExt;
use crate::id::ContentHash;
use crate::node::{Document, Node};
use crate::render::serialize_block;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for block indexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Attribute carrying the 1-based source line on each block root
    pub line_attr: String,
    /// Hash function applied to serialized blocks
    pub hash_algorithm: HashAlgorithm,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            line_attr: "data-line".to_string(),
            hash_algorithm: HashAlgorithm::Murmur3,
        }
    }
}

impl IndexConfig {
    /// Use a different line attribute
    pub fn with_line_attr(mut self, attr: impl Into<String>) -> Self {
        self.line_attr = attr.into();
        self
    }

    /// Use a different hash algorithm
    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }
}

// =============================================================================
// BlockSnapshot
// =============================================================================

/// Hashed view of one document: the last-applied baseline kept per session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSnapshot {
    /// Block hashes in document order
    pub hashes: Vec<ContentHash>,
    /// Serialized block by hash (last write wins on collision)
    pub blocks: FxHashMap<ContentHash, String>,
    /// Source line per retained block, parallel to `hashes`
    pub lines: Vec<Option<usize>>,
}

impl BlockSnapshot {
    /// Empty baseline (diffing against it inserts everything)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of retained blocks
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Serialized content for a hash
    pub fn content(&self, hash: ContentHash) -> Option<&str> {
        self.blocks.get(&hash).map(String::as_str)
    }

    /// Serialized blocks in document order
    pub fn contents(&self) -> impl Iterator<Item = &str> + '_ {
        self.hashes
            .iter()
            .map(|h| self.blocks.get(h).map_or("", String::as_str))
    }
}

// =============================================================================
// Index Statistics
// =============================================================================

/// Counters collected while indexing one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Blocks hashed
    pub block_count: usize,
    /// Whitespace text blocks dropped
    pub skipped_blank: usize,
    /// Blocks that carried a usable line number
    pub with_line: usize,
    /// Distinct hashes (lower than `block_count` with duplicate blocks)
    pub distinct: usize,
}

// =============================================================================
// Indexer
// =============================================================================

/// Hashes top-level blocks of a rendered document
#[derive(Debug, Clone, Default)]
pub struct Indexer {
    config: IndexConfig,
}

/// One block after line extraction and serialization
struct IndexedBlock {
    hash: ContentHash,
    serialized: String,
    line: Option<usize>,
}

impl Indexer {
    /// Create an indexer with the given configuration
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Index a document
    pub fn index(&self, doc: &Document) -> BlockSnapshot {
        self.index_with_stats(doc).0
    }

    /// Index a document, also returning counters
    pub fn index_with_stats(&self, doc: &Document) -> (BlockSnapshot, IndexStats) {
        let retained: Vec<&Node> = doc
            .blocks()
            .iter()
            .filter(|node| !node.is_blank_text())
            .collect();

        let mut stats = IndexStats {
            skipped_blank: doc.blocks().len() - retained.len(),
            ..IndexStats::default()
        };

        let indexed = self.index_blocks(&retained);

        let mut snapshot = BlockSnapshot {
            hashes: Vec::with_capacity(indexed.len()),
            blocks: FxHashMap::default(),
            lines: Vec::with_capacity(indexed.len()),
        };
        for block in indexed {
            if block.line.is_some() {
                stats.with_line += 1;
            }
            snapshot.hashes.push(block.hash);
            snapshot.lines.push(block.line);
            snapshot.blocks.insert(block.hash, block.serialized);
        }

        stats.block_count = snapshot.hashes.len();
        stats.distinct = snapshot.blocks.len();
        (snapshot, stats)
    }

    #[cfg(not(feature = "parallel"))]
    fn index_blocks(&self, blocks: &[&Node]) -> Vec<IndexedBlock> {
        blocks.iter().map(|node| self.index_block(node)).collect()
    }

    #[cfg(feature = "parallel")]
    fn index_blocks(&self, blocks: &[&Node]) -> Vec<IndexedBlock> {
        use rayon::prelude::*;
        // Indexed collect keeps document order
        blocks.par_iter().map(|node| self.index_block(node)).collect()
    }

    fn index_block(&self, node: &Node) -> IndexedBlock {
        let line_attr = self.config.line_attr.as_str();
        let line = node
            .as_element()
            .and_then(|elem| elem.attrs.get_attr_usize(line_attr));
        let serialized = serialize_block(node, Some(line_attr));
        let hash = ContentHash::of(&serialized, self.config.hash_algorithm);
        IndexedBlock { hash, serialized, line }
    }
}

// =============================================================================
// Tests
// =============================================================================
