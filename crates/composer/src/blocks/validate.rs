//! Schema-driven validation of block props.
//!
//! `validate_all` is a pure full recompute over the current block list:
//! callers replace their stored error map wholesale after every structural
//! or prop change, so the map can never go stale.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::BlockRegistry;
use super::schema::{FieldKind, FieldSpec};
use crate::models::BlockInstance;

/// Validate every instance in the list against the registry.
///
/// Returns a map of instance id to a single human-readable error string;
/// absence of a key means the instance is valid. An instance whose key is
/// not registered gets an "unrecognized block type" entry so the editor
/// can still show and remove it.
pub fn validate_all(
    blocks: &[BlockInstance],
    registry: &BlockRegistry,
) -> BTreeMap<Uuid, String> {
    let mut errors = BTreeMap::new();

    for instance in blocks {
        match registry.get(&instance.block_key) {
            Some(definition) => {
                let messages = definition.validate(&instance.props);
                if !messages.is_empty() {
                    errors.insert(instance.id, messages.join("; "));
                }
            }
            None => {
                errors.insert(
                    instance.id,
                    format!("unrecognized block type '{}'", instance.block_key),
                );
            }
        }
    }

    errors
}

/// Validate a props mapping against an ordered field schema.
///
/// Returns one message per violation; empty means valid.
pub fn validate_props(fields: &[FieldSpec], props: &Map<String, Value>) -> Vec<String> {
    let mut errors = Vec::new();

    for spec in fields {
        let value = props.get(&spec.name);

        if spec.required && is_empty_value(value) {
            errors.push(format!("'{}' is required", spec.label));
            continue;
        }

        let Some(value) = value.filter(|v| !v.is_null()) else {
            continue;
        };

        validate_field(spec, value, &mut errors);
    }

    errors
}

/// Whether a value counts as empty for required-field purposes.
///
/// Missing, null, blank string, and empty array are all empty; `false` is
/// a real toggle value and `0` a real number.
fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn validate_field(spec: &FieldSpec, value: &Value, errors: &mut Vec<String>) {
    match &spec.kind {
        FieldKind::Text { max_length } => {
            let Some(text) = value.as_str() else {
                errors.push(format!("'{}' must be text", spec.label));
                return;
            };
            if let Some(max) = max_length {
                // Char count, not byte count, to match the editor's
                // maxlength behavior.
                if text.chars().count() > *max {
                    errors.push(format!(
                        "'{}' exceeds the maximum length of {max} characters",
                        spec.label
                    ));
                }
            }
        }
        FieldKind::LongText { rich, .. } => {
            let Some(text) = value.as_str() else {
                errors.push(format!("'{}' must be text", spec.label));
                return;
            };
            if *rich && ammonia::clean(text) != text {
                errors.push(format!("'{}' contains disallowed HTML", spec.label));
            }
        }
        FieldKind::Number { min, max } => {
            let Some(n) = value.as_f64() else {
                errors.push(format!("'{}' must be a number", spec.label));
                return;
            };
            if let Some(min) = min.filter(|&m| n < m) {
                errors.push(format!("'{}' must be at least {min}", spec.label));
            }
            if let Some(max) = max.filter(|&m| n > m) {
                errors.push(format!("'{}' must be at most {max}", spec.label));
            }
        }
        FieldKind::Toggle => {
            if !value.is_boolean() {
                errors.push(format!("'{}' must be on or off", spec.label));
            }
        }
        FieldKind::Media { .. } => {
            let Some(reference) = value.as_str() else {
                errors.push(format!("'{}' must be a media reference", spec.label));
                return;
            };
            // Opaque asset references pass; absolute URLs must parse.
            if reference.starts_with("http://") || reference.starts_with("https://") {
                if url::Url::parse(reference).is_err() {
                    errors.push(format!("'{}' is not a valid URL", spec.label));
                }
            }
        }
        FieldKind::ItemList {
            item,
            min_items,
            max_items,
        } => validate_item_list(spec, item, *min_items, *max_items, value, errors),
    }
}

fn validate_item_list(
    spec: &FieldSpec,
    item_fields: &[FieldSpec],
    min_items: usize,
    max_items: usize,
    value: &Value,
    errors: &mut Vec<String>,
) {
    let Some(items) = value.as_array() else {
        errors.push(format!("'{}' must be a list", spec.label));
        return;
    };

    if items.len() < min_items {
        errors.push(format!(
            "'{}' requires at least {min_items} item(s), found {}",
            spec.label,
            items.len()
        ));
    }
    if items.len() > max_items {
        errors.push(format!(
            "'{}' allows at most {max_items} item(s), found {}",
            spec.label,
            items.len()
        ));
        // Skip per-item checks when the count itself is out of range.
        return;
    }

    for (i, entry) in items.iter().enumerate() {
        let pos = i + 1; // 1-based for user-facing messages
        let Some(entry) = entry.as_object() else {
            errors.push(format!("'{}' item {pos} is malformed", spec.label));
            continue;
        };

        for message in validate_props(item_fields, entry) {
            errors.push(format!("'{}' item {pos}: {message}", spec.label));
        }
    }
}
