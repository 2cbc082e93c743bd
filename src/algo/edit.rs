//! Edit-distance DP over block hash sequences
//!
//! Classic Levenshtein dynamic programming, run over hashes instead of
//! characters, with unit cost for insert, delete and update.
//!
//! # Tie-break
//!
//! When several predecessors reach the same minimal cost the backtrack
//! prefers **update**, then **insert**, then **delete**. An update replaces
//! one mounted block in place, which is less disruptive for the view than an
//! insert/delete pair.
//!
//! # Index semantics
//!
//! Edits come out in left-to-right order:
//!
//! - `Delete` / `Update`: index into the *source* sequence.
//! - `Insert`: index into the *target* sequence.
//!
//! Applying them in order to a single mutable container needs a running
//! offset on delete/update indices (see [`crate::patch`]).
//!
//! # Complexity
//!
//! - Time: O(m * n)
//! - Space: O(m * n) for the cost table
//!
//! Documents are diffed at top-level block granularity, so m and n are
//! block counts, not character counts.

// =============================================================================
// Public Types
// =============================================================================

/// Edit operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Insert,
    Delete,
    Update,
}

impl EditKind {
    /// Wire name of the operation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Update => "update",
        }
    }
}

impl std::fmt::Display for EditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One edit produced by [`edit_script`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit<T> {
    /// Source index for delete/update, target index for insert
    pub index: usize,
    /// What to do at `index`
    pub kind: EditKind,
    /// Target item for insert/update, removed source item for delete
    pub item: T,
}

impl<T> Edit<T> {
    pub fn is_insert(&self) -> bool {
        self.kind == EditKind::Insert
    }

    pub fn is_delete(&self) -> bool {
        self.kind == EditKind::Delete
    }

    pub fn is_update(&self) -> bool {
        self.kind == EditKind::Update
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Compute the minimal-cost edit script turning `source` into `target`.
///
/// Equal items at aligned positions cost nothing and produce no edit.
pub fn edit_script<T: PartialEq + Clone>(source: &[T], target: &[T]) -> Vec<Edit<T>> {
    // Quick paths
    if source == target {
        return Vec::new();
    }

    if source.is_empty() {
        return target
            .iter()
            .enumerate()
            .map(|(index, item)| Edit { index, kind: EditKind::Insert, item: item.clone() })
            .collect();
    }

    if target.is_empty() {
        // Deleting left to right: every delete addresses its original source
        // index, the applier's offset takes care of the shifting.
        return source
            .iter()
            .enumerate()
            .map(|(index, item)| Edit { index, kind: EditKind::Delete, item: item.clone() })
            .collect();
    }

    let table = CostTable::build(source, target);
    backtrack(&table, source, target)
}

/// Unit-cost edit distance between `source` and `target`.
pub fn edit_distance<T: PartialEq>(source: &[T], target: &[T]) -> usize {
    if source.is_empty() {
        return target.len();
    }
    if target.is_empty() {
        return source.len();
    }
    CostTable::build(source, target).get(source.len(), target.len())
}

// =============================================================================
// DP Core
// =============================================================================

/// (m+1) x (n+1) cost table stored row-major in a flat Vec
struct CostTable {
    cols: usize,
    cells: Vec<usize>,
}

impl CostTable {
    fn build<T: PartialEq>(source: &[T], target: &[T]) -> Self {
        let m = source.len();
        let n = target.len();
        let cols = n + 1;
        let mut cells = vec![0usize; (m + 1) * cols];

        for i in 0..=m {
            cells[i * cols] = i;
        }
        for j in 0..=n {
            cells[j] = j;
        }

        for i in 1..=m {
            for j in 1..=n {
                cells[i * cols + j] = if source[i - 1] == target[j - 1] {
                    cells[(i - 1) * cols + (j - 1)]
                } else {
                    let delete = cells[(i - 1) * cols + j];
                    let insert = cells[i * cols + (j - 1)];
                    let update = cells[(i - 1) * cols + (j - 1)];
                    1 + delete.min(insert).min(update)
                };
            }
        }

        Self { cols, cells }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }
}

/// Walk from (m, n) back to (0, 0), then reverse into left-to-right order.
fn backtrack<T: PartialEq + Clone>(table: &CostTable, source: &[T], target: &[T]) -> Vec<Edit<T>> {
    let mut i = source.len();
    let mut j = target.len();
    let mut edits = Vec::with_capacity(table.get(i, j));

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && source[i - 1] == target[j - 1] {
            i -= 1;
            j -= 1;
            continue;
        }

        let here = table.get(i, j);

        if i > 0 && j > 0 && table.get(i - 1, j - 1) + 1 == here {
            edits.push(Edit { index: i - 1, kind: EditKind::Update, item: target[j - 1].clone() });
            i -= 1;
            j -= 1;
        } else if j > 0 && table.get(i, j - 1) + 1 == here {
            edits.push(Edit { index: j - 1, kind: EditKind::Insert, item: target[j - 1].clone() });
            j -= 1;
        } else {
            debug_assert!(i > 0 && table.get(i - 1, j) + 1 == here);
            edits.push(Edit { index: i - 1, kind: EditKind::Delete, item: source[i - 1].clone() });
            i -= 1;
        }
    }

    edits.reverse();
    edits
}

// =============================================================================
// Tests
// =============================================================================
