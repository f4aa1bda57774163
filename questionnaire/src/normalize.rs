//! Stored JSON to typed field tree.
//!
//! `normalize` is total: absent, mistyped or malformed values degrade to the
//! slot default and the output always carries every slot of the schema.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::rules::formats;
use crate::schema::{Slot, SlotKind, StepSchema};
use crate::tree::{ChoiceSet, Entry, FieldTree, FieldValue};

/// Build a structurally complete tree for `schema` from untrusted JSON.
pub fn normalize(schema: &StepSchema, raw: &Value) -> FieldTree {
    let empty = Map::new();
    let object = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            debug!(step = %schema.name(), kind = json_kind(other), "Stored tree is not an object");
            &empty
        }
    };
    FieldTree::from_root(FieldValue::Group(
        schema
            .slots()
            .iter()
            .map(|slot| {
                let value = normalize_slot(slot, object.get(slot.name), slot.name);
                (slot.name.to_string(), value)
            })
            .collect(),
    ))
}

fn normalize_slot(slot: &Slot, raw: Option<&Value>, path: &str) -> FieldValue {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return slot.default_value();
    };
    let value = match &slot.kind {
        SlotKind::Choice(options) => choice(options, raw),
        SlotKind::Text => FieldValue::Text(text(raw)),
        SlotKind::Country => FieldValue::Text(country(raw)),
        SlotKind::Date => FieldValue::Date(date(raw)),
        SlotKind::Integer => FieldValue::Integer(whole_number(raw)),
        SlotKind::Codes => FieldValue::Codes(codes(raw)),
        SlotKind::Entries => FieldValue::Entries(entries(raw)),
        SlotKind::Group(children) => {
            let empty = Map::new();
            let object = raw.as_object().unwrap_or(&empty);
            FieldValue::Group(
                children
                    .iter()
                    .map(|child| {
                        let child_path = format!("{path}.{}", child.name);
                        (
                            child.name.to_string(),
                            normalize_slot(child, object.get(child.name), &child_path),
                        )
                    })
                    .collect(),
            )
        }
    };
    if value.is_empty() && !is_blank(raw) {
        debug!(path = %path, kind = json_kind(raw), "Dropped malformed stored value");
    }
    value
}

fn choice(options: &[&str], raw: &Value) -> FieldValue {
    let set = match raw {
        Value::Object(map) => ChoiceSet::from_flags(
            options,
            map.iter()
                .map(|(key, flag)| (key.as_str(), flag.as_bool().unwrap_or(false))),
        ),
        _ => ChoiceSet::new(options),
    };
    FieldValue::Choice(set)
}

fn text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn country(raw: &Value) -> Option<String> {
    raw.as_str()
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|code| formats::is_country_code(code))
}

fn date(raw: &Value) -> Option<String> {
    raw.as_str()
        .map(str::trim)
        .filter(|s| {
            formats::is_date_shape(s) && chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        })
        .map(str::to_string)
}

/// Non-negative whole number from a JSON number or numeric string.
pub(crate) fn whole_number(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }
}

fn codes(raw: &Value) -> Vec<String> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(country)
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

fn entries(raw: &Value) -> Vec<Entry> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| Entry {
            label: item.get("label").and_then(text),
            value: item.get("value").and_then(whole_number),
        })
        .filter(|entry| entry.label.is_some() || entry.value.is_some())
        .collect()
}

fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.values().all(|v| v.is_null() || v == &Value::Bool(false)),
        _ => false,
    }
}

fn json_kind(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
