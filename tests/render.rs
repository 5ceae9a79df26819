//! Seed loading and the render effect, end to end.

use std::io::Write;

use rstest::rstest;
use spark_tree::{
    load_seed, mount, parse_seed, render_frame, reset_registry, seed_data, to_json, MemorySink,
    NodeKind, RootHost, TreeError, Viewport,
};

#[test]
fn frames_follow_root_changes() {
    reset_registry();

    let root = RootHost::new(seed_data()).unwrap();
    let sink = MemorySink::new();
    let handle = mount(&root, sink.clone(), Viewport::inline(40));
    assert_eq!(sink.frame_count(), 1);

    root.activate();

    assert_eq!(root.change_count(), 4);
    assert_eq!(handle.frame_count(), 5);
    assert_eq!(sink.frame_count(), 5);

    let lines = sink.last_frame().unwrap().to_lines();
    let text = lines.join("\n");
    for label in ["AndrewAndrew", "BrookeBrooke", "DanDan", "ErickErick", "#3"] {
        assert!(text.contains(label), "missing {label} in\n{text}");
    }
}

#[test]
fn first_frame_shows_seed_values() {
    let frame = render_frame(&seed_data(), Viewport::inline(40)).unwrap();
    let text = frame.to_lines().join("\n");

    assert!(text.contains("Andrew"));
    assert!(!text.contains("AndrewAndrew"));
    assert_eq!(frame.width(), 40);
    assert_eq!(frame.height(), 14);
}

#[test]
fn seed_file_round_trip() {
    let json = serde_json::to_string(&to_json(&seed_data())).unwrap();
    let path = std::env::temp_dir().join(format!("spark-tree-seed-{}.json", std::process::id()));
    std::fs::File::create(&path)
        .unwrap()
        .write_all(json.as_bytes())
        .unwrap();

    let loaded = load_seed(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, seed_data());
}

#[test]
fn missing_seed_file_is_io_error() {
    let result = load_seed(std::path::Path::new("/nonexistent/spark-tree/seed.json"));
    assert!(matches!(result, Err(TreeError::Io(_))));
}

#[rstest]
#[case(r#"[{"key": 1, "type": "Node", "value": ["x"]}]"#, 1, NodeKind::Leaf)]
#[case(r#"[{"key": 7, "type": "Tree", "value": "x"}]"#, 7, NodeKind::Composite)]
#[case(
    r#"[{"key": 1, "type": "Tree", "value": [{"key": 2, "type": "Node", "value": 5}]}]"#,
    2,
    NodeKind::Leaf
)]
fn mismatched_seed_rejected(#[case] json: &str, #[case] key: i64, #[case] declared: NodeKind) {
    match parse_seed(json) {
        Err(TreeError::StructuralMismatch {
            key: k,
            declared: d,
            ..
        }) => {
            assert_eq!(k, key);
            assert_eq!(d, declared);
        }
        other => panic!("expected StructuralMismatch, got {other:?}"),
    }
}

#[test]
fn duplicate_seed_keys_rejected() {
    let json = r#"[
        {"key": 1, "type": "Node", "value": "a"},
        {"key": 1, "type": "Node", "value": "b"}
    ]"#;
    assert!(matches!(
        parse_seed(json),
        Err(TreeError::DuplicateKey { key: 1 })
    ));
}
