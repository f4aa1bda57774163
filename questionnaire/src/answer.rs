//! Typed answers decoded from raw request JSON.
//!
//! Decoding is shape-directed: the addressed slot says which [`Answer`]
//! variant to expect. Unlike the normalizer, decoding is strict; a wrong
//! shape is reported back to the caller instead of being defaulted.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::FieldErrors;
use crate::schema::{Slot, SlotKind};
use crate::tree::{ChoiceSet, Entry, FieldValue};

pub const INVALID_ANSWER: &str = "Invalid answer";
pub const NOT_WHOLE_NUMBER: &str = "Must be a non-negative whole number";
pub const MULTIPLE_CHOICES: &str = "Choose only one option";

/// A decoded answer, one variant per question category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Boolean map for a choice set
    Choice(BTreeMap<String, bool>),
    /// Scalar text, country code or date
    Text(Option<String>),
    /// Whole number
    Integer(Option<u64>),
    /// Country code collection
    Codes(Vec<String>),
    /// Label/value list
    Entries(Vec<EntryAnswer>),
    /// Composite block
    Group(BTreeMap<String, Answer>),
}

/// One submitted label/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryAnswer {
    pub label: Option<String>,
    pub value: Option<u64>,
}

impl Answer {
    /// Decode `raw` for `slot`. Errors are keyed under `path`.
    pub fn decode(slot: &Slot, raw: &Value, path: &str) -> Result<Answer, FieldErrors> {
        let mut errors = FieldErrors::new();
        let answer = decode_into(slot, raw, path, &mut errors);
        errors.into_result(answer)
    }

    /// Convert into a tree value shaped like `slot`.
    pub fn into_value(self, slot: &Slot) -> FieldValue {
        match (self, &slot.kind) {
            (Answer::Choice(flags), SlotKind::Choice(options)) => FieldValue::Choice(
                ChoiceSet::from_flags(options, flags.iter().map(|(k, v)| (k.as_str(), *v))),
            ),
            (Answer::Text(v), SlotKind::Date) => FieldValue::Date(v),
            (Answer::Text(v), SlotKind::Country) => {
                FieldValue::Text(v.map(|s| s.to_ascii_uppercase()))
            }
            (Answer::Text(v), SlotKind::Text) => FieldValue::Text(v),
            (Answer::Integer(v), SlotKind::Integer) => FieldValue::Integer(v),
            (Answer::Codes(v), SlotKind::Codes) => FieldValue::Codes(v),
            (Answer::Entries(v), SlotKind::Entries) => FieldValue::Entries(
                v.into_iter()
                    .map(|e| Entry {
                        label: e.label,
                        value: e.value,
                    })
                    .collect(),
            ),
            (Answer::Group(mut children), SlotKind::Group(slots)) => FieldValue::Group(
                slots
                    .iter()
                    .map(|child| {
                        let value = match children.remove(child.name) {
                            Some(answer) => answer.into_value(child),
                            None => child.default_value(),
                        };
                        (child.name.to_string(), value)
                    })
                    .collect(),
            ),
            // decode never pairs an answer with a foreign slot kind
            (_, _) => slot.default_value(),
        }
    }
}

fn decode_into(slot: &Slot, raw: &Value, path: &str, errors: &mut FieldErrors) -> Answer {
    match &slot.kind {
        SlotKind::Choice(options) => Answer::Choice(decode_choice(options, raw, path, errors)),
        SlotKind::Text | SlotKind::Country | SlotKind::Date => {
            Answer::Text(decode_text(raw, path, errors))
        }
        SlotKind::Integer => Answer::Integer(decode_integer(raw, path, errors)),
        SlotKind::Codes => Answer::Codes(decode_codes(raw, path, errors)),
        SlotKind::Entries => Answer::Entries(decode_entries(raw, path, errors)),
        SlotKind::Group(children) => {
            let empty = serde_json::Map::new();
            let object = match raw {
                Value::Object(map) => map,
                Value::Null => &empty,
                _ => {
                    errors.insert(path, INVALID_ANSWER);
                    &empty
                }
            };
            Answer::Group(
                children
                    .iter()
                    .map(|child| {
                        let child_raw = object.get(child.name).unwrap_or(&Value::Null);
                        let child_path = format!("{path}.{}", child.name);
                        (
                            child.name.to_string(),
                            decode_into(child, child_raw, &child_path, errors),
                        )
                    })
                    .collect(),
            )
        }
    }
}

fn decode_choice(
    options: &[&str],
    raw: &Value,
    path: &str,
    errors: &mut FieldErrors,
) -> BTreeMap<String, bool> {
    let mut flags = BTreeMap::new();
    let map = match raw {
        Value::Null => return flags,
        Value::Object(map) => map,
        _ => {
            errors.insert(path, INVALID_ANSWER);
            return flags;
        }
    };
    for (key, flag) in map {
        let Some(flag) = flag.as_bool() else {
            errors.insert(path, INVALID_ANSWER);
            continue;
        };
        if !options.iter().any(|o| *o == key.as_str()) {
            errors.insert(path, format!("Unknown option: {key}"));
            continue;
        }
        flags.insert(key.clone(), flag);
    }
    if flags.values().filter(|f| **f).count() > 1 {
        errors.insert(path, MULTIPLE_CHOICES);
    }
    flags
}

fn decode_text(raw: &Value, path: &str, errors: &mut FieldErrors) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => {
            errors.insert(path, INVALID_ANSWER);
            None
        }
    }
}

fn decode_integer(raw: &Value, path: &str, errors: &mut FieldErrors) -> Option<u64> {
    let parsed = match raw {
        Value::Null => return None,
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.insert(path, NOT_WHOLE_NUMBER);
    }
    parsed
}

fn decode_codes(raw: &Value, path: &str, errors: &mut FieldErrors) -> Vec<String> {
    match raw {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item.as_str() {
                Some(code) => Some(code.trim().to_ascii_uppercase()),
                None => {
                    errors.insert(path, INVALID_ANSWER);
                    None
                }
            })
            .collect(),
        _ => {
            errors.insert(path, INVALID_ANSWER);
            Vec::new()
        }
    }
}

fn decode_entries(raw: &Value, path: &str, errors: &mut FieldErrors) -> Vec<EntryAnswer> {
    let items = match raw {
        Value::Null => return Vec::new(),
        Value::Array(items) => items,
        _ => {
            errors.insert(path, INVALID_ANSWER);
            return Vec::new();
        }
    };
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let entry_path = format!("{path}.{idx}");
            match item {
                Value::Object(map) => EntryAnswer {
                    label: decode_text(
                        map.get("label").unwrap_or(&Value::Null),
                        &format!("{entry_path}.label"),
                        errors,
                    ),
                    value: decode_integer(
                        map.get("value").unwrap_or(&Value::Null),
                        &format!("{entry_path}.value"),
                        errors,
                    ),
                },
                _ => {
                    errors.insert(entry_path, INVALID_ANSWER);
                    EntryAnswer {
                        label: None,
                        value: None,
                    }
                }
            }
        })
        .collect()
}
