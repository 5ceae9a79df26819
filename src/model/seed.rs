//! Seed data - the built-in tree and the JSON seed format.
//!
//! The JSON format is an array of objects:
//!
//! ```json
//! [
//!   { "key": 1, "type": "Node", "value": "Andrew" },
//!   { "key": 3, "type": "Tree", "value": [ { "key": 4, "type": "Node", "value": "Dan" } ] }
//! ]
//! ```
//!
//! `"Leaf"` and `"Composite"` are accepted as aliases for `"Node"` and `"Tree"`.

use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::TreeError;
use crate::types::{Entries, Key, NodeKind, NodeValue};

use super::validate;

/// The built-in tree: two leaves and one composite holding two leaves.
pub fn seed_data() -> Entries {
    vec![
        Rc::new(NodeValue::leaf(1, "Andrew")),
        Rc::new(NodeValue::leaf(2, "Brooke")),
        Rc::new(NodeValue::composite(
            3,
            vec![
                Rc::new(NodeValue::leaf(4, "Dan")),
                Rc::new(NodeValue::leaf(5, "Erick")),
            ],
        )),
    ]
}

/// Entry as it appears on disk: the kind is declared, the value is untyped.
#[derive(Debug, Deserialize)]
struct RawNode {
    key: Key,
    #[serde(rename = "type")]
    kind: NodeKind,
    value: Value,
}

/// Parse a JSON seed document into validated entries.
#[instrument(level = "debug", skip(json), fields(bytes = json.len()))]
pub fn parse_seed(json: &str) -> Result<Entries, TreeError> {
    let raw: Vec<RawNode> = serde_json::from_str(json)?;
    let entries = convert_all(raw)?;
    validate(&entries)?;
    debug!(entries = entries.len(), "seed parsed");
    Ok(entries)
}

/// Read and parse a JSON seed file.
pub fn load_seed(path: &Path) -> Result<Entries, TreeError> {
    let text = fs::read_to_string(path)?;
    parse_seed(&text)
}

fn convert_all(raw: Vec<RawNode>) -> Result<Entries, TreeError> {
    raw.into_iter()
        .map(|node| convert(node).map(Rc::new))
        .collect()
}

fn convert(raw: RawNode) -> Result<NodeValue, TreeError> {
    match (raw.kind, raw.value) {
        (NodeKind::Leaf, Value::String(text)) => Ok(NodeValue::leaf(raw.key, text)),
        (NodeKind::Composite, Value::Array(items)) => {
            let children = items
                .into_iter()
                .map(serde_json::from_value::<RawNode>)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NodeValue::composite(raw.key, convert_all(children)?))
        }
        (declared, other) => Err(TreeError::StructuralMismatch {
            key: raw.key,
            declared,
            found: json_shape(&other).to_string(),
        }),
    }
}

fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::to_json;

    const SEED_JSON: &str = r#"[
        { "key": 1, "type": "Node", "value": "Andrew" },
        { "key": 2, "type": "Node", "value": "Brooke" },
        { "key": 3, "type": "Tree", "value": [
            { "key": 4, "type": "Node", "value": "Dan" },
            { "key": 5, "type": "Node", "value": "Erick" }
        ] }
    ]"#;

    #[test]
    fn test_parse_matches_builtin() {
        let parsed = parse_seed(SEED_JSON).unwrap();
        assert_eq!(parsed, seed_data());
    }

    #[test]
    fn test_aliases_accepted() {
        let parsed = parse_seed(
            r#"[{ "key": 9, "type": "Composite", "value": [{ "key": 1, "type": "Leaf", "value": "x" }] }]"#,
        )
        .unwrap();
        assert_eq!(parsed[0].kind(), NodeKind::Composite);
    }

    #[test]
    fn test_leaf_with_array_is_mismatch() {
        let err = parse_seed(r#"[{ "key": 1, "type": "Node", "value": [] }]"#).unwrap_err();
        match err {
            TreeError::StructuralMismatch { key, declared, found } => {
                assert_eq!(key, 1);
                assert_eq!(declared, NodeKind::Leaf);
                assert_eq!(found, "array");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_nested_tree_with_string_is_mismatch() {
        let err = parse_seed(
            r#"[{ "key": 3, "type": "Tree", "value": [{ "key": 4, "type": "Tree", "value": "Dan" }] }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, TreeError::StructuralMismatch { key: 4, .. }));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let err = parse_seed(
            r#"[{ "key": 1, "type": "Node", "value": "a" }, { "key": 1, "type": "Node", "value": "b" }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, TreeError::DuplicateKey { key: 1 }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_seed("{ nope"), Err(TreeError::Seed(_))));
    }

    #[test]
    fn test_to_json_reparses() {
        let text = to_json(&seed_data()).to_string();
        assert_eq!(parse_seed(&text).unwrap(), seed_data());
    }
}
