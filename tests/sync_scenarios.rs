//! End-to-end scenarios: rendered documents in, patched preview out.

use std::time::{Duration, Instant};

use md_livesync::prelude::*;

fn block(tag: &str, line: usize, text: &str) -> Node {
    Element::new(tag).attr("data-line", line.to_string()).text(text).into()
}

fn doc(labels: &[&str]) -> Document {
    let mut blocks = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        blocks.push(block("p", i + 1, label));
        blocks.push(Text::new("\n").into());
    }
    Document::from_blocks(blocks)
}

fn ops(old: &[&str], new: &[&str]) -> Vec<(usize, EditKind, String)> {
    let indexer = Indexer::default();
    diff(&indexer.index(&doc(old)), &indexer.index(&doc(new)))
        .script
        .ops
        .into_iter()
        .map(|op| (op.index, op.operation, op.content))
        .collect()
}

#[test]
fn update_in_middle() {
    assert_eq!(
        ops(&["a", "b", "c"], &["a", "x", "c"]),
        vec![(1, EditKind::Update, "<p>x</p>".to_string())]
    );
}

#[test]
fn append_at_end() {
    assert_eq!(
        ops(&["a", "b"], &["a", "b", "c"]),
        vec![(2, EditKind::Insert, "<p>c</p>".to_string())]
    );
}

#[test]
fn delete_in_middle() {
    assert_eq!(ops(&["a", "b", "c"], &["a", "c"]), vec![(1, EditKind::Delete, String::new())]);
}

#[test]
fn hash_travels_as_decimal_string() {
    let indexer = Indexer::default();
    let new = indexer.index(&doc(&["a", "x"]));
    let script = diff(&indexer.index(&doc(&["a"])), &new).script;

    let json: serde_json::Value = serde_json::from_str(&SyncMessage::Edit(script).to_json().unwrap()).unwrap();
    let hash = json["editScripts"][0]["contentHash"].as_str().unwrap();
    assert_eq!(hash.parse::<ContentHash>().unwrap(), new.hashes[1]);
    assert_eq!(json["dataLineArray"], serde_json::json!([1, 2]));
}

#[test]
fn preview_follows_a_writing_session() {
    let config = SyncConfig::default();
    let mut session = SyncSession::new(&config);
    let mut client: PreviewClient<BlockView> = PreviewClient::new(&config);
    let mut view = BlockView::new();
    let mut now = Instant::now();

    let drafts: [&[&str]; 5] = [
        &["title"],
        &["title", "intro"],
        &["title", "intro", "body"],
        &["title", "body"],
        &["title v2", "body", "outro", "intro"],
    ];

    for draft in drafts {
        for message in session.update(&doc(draft)) {
            assert!(client.receive(&message.to_json().unwrap()));
        }
        let report = client.drain(&mut view, &mut NoRefresh, now);
        assert!(report.skipped.is_empty());

        let expected: Vec<String> = draft.iter().map(|l| format!("<p>{l}</p>")).collect();
        assert_eq!(view.contents(), expected);
        now += Duration::from_millis(250);
    }
}

#[test]
fn embedded_diagram_triggers_refresh() {
    let config = SyncConfig::default();
    let mut session = SyncSession::new(&config);
    let mut client: PreviewClient<BlockView> = PreviewClient::new(&config);
    let mut view = BlockView::new();
    let now = Instant::now();

    let _ = session.update(&doc(&["a"]));
    let mut changed = doc(&["a"]);
    changed.root.push_elem(
        Element::new("pre")
            .attr("data-line", "3")
            .with_class("mermaid")
            .text("graph TD; A-->B"),
    );

    for message in session.update(&changed) {
        client.enqueue(message);
    }
    let mut refreshed = Vec::new();
    let mut hook = |kind: &str| refreshed.push(kind.to_string());
    // The preview never saw the first version, so the insert lands at the end
    let report = client.drain(&mut view, &mut hook, now);

    assert_eq!(report.refreshed, vec!["diagram".to_string()]);
    assert_eq!(refreshed, vec!["diagram".to_string()]);
}

#[test]
fn desynchronized_view_skips_and_recovers() {
    let config = SyncConfig::default();
    let mut session = SyncSession::new(&config);
    let mut client: PreviewClient<BlockView> = PreviewClient::new(&config);
    let mut view = BlockView::new();
    let now = Instant::now();

    // The first round (reload + content) is lost in transit
    let _ = session.update(&doc(&["a", "b", "c"]));
    for message in session.update(&doc(&["a", "c"])) {
        client.enqueue(message);
    }
    let report = client.drain(&mut view, &mut NoRefresh, now);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].is_desync());

    // A reload brings it back
    client.enqueue(session.reload());
    for message in session.update(&doc(&["a", "c"])) {
        client.enqueue(message);
    }
    let report = client.drain(&mut view, &mut NoRefresh, now);
    assert!(report.skipped.is_empty());
    assert_eq!(view.contents(), vec!["<p>a</p>", "<p>c</p>"]);
}
