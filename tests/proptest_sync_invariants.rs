//! Property-based invariant tests for the sync core.
//!
//! 1. Diffing a snapshot against itself yields no operations.
//! 2. Applying diff(A, B) to a view mounted from A yields B.
//! 3. Script length equals a reference Levenshtein distance.
//! 4. Sequential application with a running offset never skips an operation
//!    and leaves the target's line metadata on the view.
//! 5. Pushing a line to the view and reading it back is within one line.
//! 6. Programmatic scrolls are not reported back inside the debounce window.
//! 7. Message encoding never panics and decodes back to the same message.

use std::time::{Duration, Instant};

use md_livesync::prelude::*;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Small alphabet so duplicates and shared blocks are common.
fn arb_labels(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..5, 0..=max_len)
}

fn document(labels: &[u8]) -> Document {
    let blocks = labels.iter().enumerate().map(|(i, label)| {
        let tag = if label % 2 == 0 { "p" } else { "h2" };
        Node::from(
            Element::new(tag)
                .attr("data-line", (i * 2 + 1).to_string())
                .text(format!("block {label}")),
        )
    });
    Document::from_blocks(blocks)
}

fn snapshot(labels: &[u8]) -> BlockSnapshot {
    Indexer::default().index(&document(labels))
}

fn reference_levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, x) in a.iter().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, y) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(x != y);
            row[j + 1] = substitution.min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }
    prev[b.len()]
}

fn arb_message() -> impl Strategy<Value = SyncMessage> {
    prop_oneof![
        Just(SyncMessage::Reload),
        (0u32..10_000).prop_map(|l| SyncMessage::EditorScroll { line: f64::from(l) / 4.0 }),
        (0u32..10_000).prop_map(|l| SyncMessage::PreviewScroll { line: f64::from(l) / 4.0 }),
        (0usize..500, 0usize..200).prop_map(|(line_number, relative_char_number)| {
            SyncMessage::Cursor { line_number, relative_char_number }
        }),
        (arb_labels(6), arb_labels(6))
            .prop_map(|(a, b)| SyncMessage::Edit(diff(&snapshot(&a), &snapshot(&b)).script)),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. No-op diff
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn diff_with_self_is_empty(labels in arb_labels(20)) {
        let s = snapshot(&labels);
        let result = diff(&s, &s);
        prop_assert!(result.script.ops.is_empty());
        prop_assert!(!result.should_reload);
        prop_assert_eq!(result.stats.kept, labels.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn apply_diff_reaches_target(a in arb_labels(12), b in arb_labels(12)) {
        let old = snapshot(&a);
        let new = snapshot(&b);
        let mut view = BlockView::from_snapshot(&old);

        let script = diff(&old, &new).script;
        let report = PatchApplier::new(PatchConfig::plain())
            .apply(&mut view, &script, &mut NoRefresh, Instant::now());

        let expected: Vec<&str> = new.contents().collect();
        prop_assert!(report.is_clean(), "skipped ops: {:?}", report.skipped);
        prop_assert_eq!(view.contents(), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Minimality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn script_length_is_edit_distance(a in arb_labels(10), b in arb_labels(10)) {
        let old = snapshot(&a);
        let new = snapshot(&b);
        let result = diff(&old, &new);

        prop_assert_eq!(result.script.ops.len(), reference_levenshtein(&old.hashes, &new.hashes));
        prop_assert_eq!(result.stats.total_ops(), result.script.ops.len());
    }
}

proptest! {
    #[test]
    fn generic_edit_script_is_minimal(a in arb_labels(10), b in arb_labels(10)) {
        prop_assert_eq!(edit_script(&a, &b).len(), reference_levenshtein(&a, &b));
        prop_assert_eq!(edit_distance(&a, &b), reference_levenshtein(&a, &b));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Index drift
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn running_offset_applies_every_op(a in arb_labels(15), b in arb_labels(15)) {
        let old = snapshot(&a);
        let new = snapshot(&b);
        let mut view = BlockView::from_snapshot(&old);
        let script = diff(&old, &new).script;

        let report = PatchApplier::new(PatchConfig::plain())
            .apply(&mut view, &script, &mut NoRefresh, Instant::now());

        prop_assert_eq!(report.applied, script.ops.len());
        prop_assert_eq!(view.len(), new.len());
        let lines: Vec<Option<usize>> = view.blocks().iter().map(|b| b.line).collect();
        prop_assert_eq!(lines, new.lines.clone());
    }
}

proptest! {
    #[test]
    fn chained_scripts_stay_in_sync(steps in prop::collection::vec(arb_labels(8), 1..6)) {
        let mut session = SyncSession::new(&SyncConfig::default());
        let mut client: PreviewClient<BlockView> = PreviewClient::new(&SyncConfig::default());
        let mut view = BlockView::new();
        let now = Instant::now();

        for labels in &steps {
            for message in session.update(&document(labels)) {
                client.enqueue(message);
            }
            let report = client.drain(&mut view, &mut NoRefresh, now);
            prop_assert!(report.skipped.is_empty());

            let target = snapshot(labels);
            let expected: Vec<&str> = target.contents().collect();
            prop_assert_eq!(view.contents(), expected);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Scroll symmetry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn push_then_pull_is_within_one_line(
        count in 2usize..40,
        spacing in 1usize..6,
        height in 5u32..80,
        pick in 0.0f64..1.0,
    ) {
        let mut view = BlockView::new();
        for i in 0..count {
            view.insert_block(i, "<p>x</p>");
            view.set_block_line(i, Some(1 + i * spacing));
            view.set_height(i, f64::from(height));
        }
        let last_line = 1 + (count - 1) * spacing;
        let line = (1.0 + pick * (last_line - 1) as f64).floor();

        let mut sync = ScrollSync::default();
        sync.push_line(&mut view, line, Instant::now());
        let pulled = offset_to_line(&view.anchors(), view.scroll_top());

        prop_assert!(pulled.is_some());
        let pulled = pulled.unwrap_or_default();
        prop_assert!((pulled - line).abs() <= 1.0, "pushed {} pulled {}", line, pulled);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Feedback suppression
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn echoes_inside_window_are_suppressed(gaps in prop::collection::vec(0u64..600, 1..8)) {
        let mut view = BlockView::new();
        for i in 0..20 {
            view.insert_block(i, "<p>x</p>");
            view.set_block_line(i, Some(i + 1));
        }
        let start = Instant::now();
        let mut sync = ScrollSync::default();
        prop_assert!(sync.push_line(&mut view, 10.0, start));

        // Each event lands within the debounce window of the previous one
        let mut at = start;
        for gap in gaps {
            at += Duration::from_millis(gap);
            prop_assert_eq!(sync.observe_scroll(&view, at), None);
        }

        let quiet = at + ScrollConfig::default().debounce;
        prop_assert!(sync.observe_scroll(&view, quiet).is_some());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Message codec
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn messages_survive_json(message in arb_message()) {
        let json = message.to_json();
        prop_assert!(json.is_ok());
        let decoded = SyncMessage::from_json(&json.unwrap_or_default());
        prop_assert!(decoded.is_ok(), "decode failed: {:?}", decoded);
        prop_assert_eq!(decoded.unwrap_or(SyncMessage::Reload), message);
    }
}

proptest! {
    #[test]
    fn arbitrary_input_never_panics(input in ".{0,200}") {
        let mut client: PreviewClient<BlockView> = PreviewClient::new(&SyncConfig::default());
        let _ = client.receive(&input);
        let mut view = BlockView::new();
        let _ = client.drain(&mut view, &mut NoRefresh, Instant::now());
    }
}
