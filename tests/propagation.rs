//! End-to-end propagation through a full unit tree.

use std::cell::RefCell;
use std::rc::Rc;

use rstest::rstest;
use serde_json::json;
use spark_tree::{
    get_activation_count, get_allocated_count, reset_registry, seed_data, values_json,
    CompositeUnit, Entries, LeafUnit, NodeKind, NodeValue, RootHost, UnitState,
};

fn collecting_composite(initial: Entries) -> (CompositeUnit, Rc<RefCell<Vec<Entries>>>) {
    let reports = Rc::new(RefCell::new(Vec::new()));
    let sink = reports.clone();
    let unit = CompositeUnit::new(initial, move |entries| sink.borrow_mut().push(entries)).unwrap();
    (unit, reports)
}

#[test]
fn seed_shape() {
    let seed = seed_data();

    assert_eq!(seed.len(), 3);
    assert_eq!(
        seed.iter().map(|e| (e.key(), e.kind())).collect::<Vec<_>>(),
        vec![
            (1, NodeKind::Leaf),
            (2, NodeKind::Leaf),
            (3, NodeKind::Composite)
        ]
    );
    assert_eq!(values_json(&seed), json!(["Andrew", "Brooke", ["Dan", "Erick"]]));
}

#[rstest]
#[case("Andrew", "AndrewAndrew")]
#[case("Dan", "DanDan")]
#[case("", "")]
#[case("日本", "日本日本")]
fn leaf_reports_doubled_once(#[case] value: &str, #[case] expected: &str) {
    reset_registry();

    let reports = Rc::new(RefCell::new(Vec::new()));
    let sink = reports.clone();
    let leaf = LeafUnit::new(value, move |v| sink.borrow_mut().push(v));

    assert!(reports.borrow().is_empty());
    assert!(leaf.activate());
    assert!(!leaf.activate());

    assert_eq!(*reports.borrow(), vec![expected.to_string()]);
    assert_eq!(leaf.state(), UnitState::Active);
}

#[test]
fn root_converges_to_doubled_values() {
    reset_registry();

    let root = RootHost::new(seed_data()).unwrap();
    root.activate();

    let entries = root.entries();
    assert_eq!(
        values_json(&entries),
        json!(["AndrewAndrew", "BrookeBrooke", ["DanDan", "ErickErick"]])
    );
    assert_eq!(
        entries.iter().map(|e| (e.key(), e.kind())).collect::<Vec<_>>(),
        vec![
            (1, NodeKind::Leaf),
            (2, NodeKind::Leaf),
            (3, NodeKind::Composite)
        ]
    );

    // Quiescent: nothing more happens without new activations
    let changes = root.change_count();
    assert!(!root.activate());
    assert_eq!(root.change_count(), changes);
    assert_eq!(get_activation_count(), 6);
}

#[test]
fn report_touches_only_its_position() {
    reset_registry();

    let seed = seed_data();
    let (unit, reports) = collecting_composite(seed.clone());
    unit.activate();

    let reports = reports.borrow();
    // First report comes from position 0
    let first = &reports[0];
    assert_eq!(first[0].payload().as_text(), Some("AndrewAndrew"));
    assert!(Rc::ptr_eq(&first[1], &seed[1]));
    assert!(Rc::ptr_eq(&first[2], &seed[2]));

    // Second from position 1; position 0 is carried over untouched
    let second = &reports[1];
    assert!(Rc::ptr_eq(&second[0], &first[0]));
    assert!(Rc::ptr_eq(&second[2], &seed[2]));

    // The nested composite at position 2 reports once per inner leaf
    assert_eq!(reports.len(), 4);
    for pair in reports[1..].windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        assert!(Rc::ptr_eq(&next[0], &previous[0]));
        assert!(Rc::ptr_eq(&next[1], &previous[1]));
        assert!(!Rc::ptr_eq(&next[2], &previous[2]));
    }
    assert_eq!(
        values_json(&reports[3]),
        json!(["AndrewAndrew", "BrookeBrooke", ["DanDan", "ErickErick"]])
    );
}

#[test]
fn rerender_does_not_rereport() {
    reset_registry();

    let root = RootHost::new(seed_data()).unwrap();
    root.activate();
    let changes = root.change_count();

    let leaf = root.tree().child(1).unwrap();
    let leaf = leaf.as_leaf().unwrap();
    assert_eq!(leaf.report_count(), 1);

    // A reorder re-renders every child with its current value
    root.tree().reorder(&[1, 2, 3]).unwrap();

    assert_eq!(leaf.report_count(), 1);
    assert_eq!(root.change_count(), changes + 1);
}

#[rstest]
#[case(&[3, 2, 1])]
#[case(&[2, 3, 1])]
#[case(&[1, 3, 2])]
fn reorder_preserves_identity(#[case] order: &[i64]) {
    reset_registry();

    let root = RootHost::new(seed_data()).unwrap();
    root.activate();

    let tree = root.tree();
    let before = tree.child_ids();
    let allocated = get_allocated_count();
    let activations = get_activation_count();

    tree.reorder(order).unwrap();

    let after = tree.child_ids();
    assert_eq!(after.iter().map(|(k, _)| *k).collect::<Vec<_>>(), order);
    for (key, id) in &after {
        let (_, old) = before.iter().find(|(k, _)| k == key).unwrap();
        assert_eq!(id, old);
    }
    assert_eq!(get_allocated_count(), allocated);
    assert_eq!(get_activation_count(), activations);
    assert_eq!(
        root.entries().iter().map(|e| e.key()).collect::<Vec<_>>(),
        order
    );
}

#[test]
fn report_after_reorder_lands_at_new_position() {
    reset_registry();

    let seed = vec![
        Rc::new(NodeValue::leaf(1, "a")),
        Rc::new(NodeValue::composite(2, vec![Rc::new(NodeValue::leaf(3, "b"))])),
    ];
    let root = RootHost::new(seed).unwrap();
    root.activate();
    root.tree().reorder(&[2, 1]).unwrap();

    let inner = root.tree().child(2).unwrap();
    let inner = inner.as_composite().unwrap();
    inner.reorder(&[3]).unwrap();

    assert_eq!(values_json(&root.entries()), json!([["bb"], "aa"]));
}
