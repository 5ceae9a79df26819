//! Tree model - validation, projections and seed data.

mod seed;

pub use seed::{load_seed, parse_seed, seed_data};

use std::collections::HashSet;
use std::rc::Rc;

use serde_json::{Value, json};

use crate::error::TreeError;
use crate::types::{NodeValue, Payload};

/// Check sibling-key uniqueness at every level.
pub fn validate(entries: &[Rc<NodeValue>]) -> Result<(), TreeError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.key()) {
            return Err(TreeError::DuplicateKey { key: entry.key() });
        }
        if let Payload::Composite(children) = entry.payload() {
            validate(children)?;
        }
    }
    Ok(())
}

/// Project a sequence to its values only: strings and nested arrays.
pub fn values_json(entries: &[Rc<NodeValue>]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|entry| match entry.payload() {
                Payload::Leaf(text) => Value::String(text.clone()),
                Payload::Composite(children) => values_json(children),
            })
            .collect(),
    )
}

/// Serialize a sequence back to the seed format.
pub fn to_json(entries: &[Rc<NodeValue>]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|entry| {
                let value = match entry.payload() {
                    Payload::Leaf(text) => Value::String(text.clone()),
                    Payload::Composite(children) => to_json(children),
                };
                json!({ "key": entry.key(), "type": entry.kind(), "value": value })
            })
            .collect(),
    )
}

/// Number of leaves anywhere below `entries`.
pub fn leaf_count(entries: &[Rc<NodeValue>]) -> usize {
    entries
        .iter()
        .map(|entry| match entry.payload() {
            Payload::Leaf(_) => 1,
            Payload::Composite(children) => leaf_count(children),
        })
        .sum()
}
