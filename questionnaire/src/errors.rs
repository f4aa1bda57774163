//! Error types.
//!
//! Validation problems are data, not failures: they travel as a
//! [`FieldErrors`] map keyed by dotted field path. [`SchemaError`] is
//! reserved for malformed step definitions caught at construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Message reported for question ids the step does not define.
pub const UNSUPPORTED_QUESTION: &str = "Unsupported question";

/// Path key used for errors that concern the question id itself.
pub const QUESTION_ID_PATH: &str = "questionId";

/// Field path → human message. The first message recorded for a path wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-entry map.
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(path, message);
        errors
    }

    /// Record a message unless the path already has one.
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    /// Merge another map; existing messages are kept.
    pub fn extend(&mut self, other: FieldErrors) {
        for (path, message) in other.0 {
            self.insert(path, message);
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    /// Whether any error sits at `prefix` or below it.
    pub fn any_under(&self, prefix: &str) -> bool {
        self.0
            .keys()
            .any(|k| k == prefix || k.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('.')))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Problems in a step definition, reported when the schema is built.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Two questions share an id
    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(String),

    /// A question, rule or condition refers to a path with no slot
    #[error("Unknown field path: {0}")]
    UnknownPath(String),

    /// The rule cannot validate the addressed slot's shape
    #[error("Rule does not fit slot at {path}: {reason}")]
    IncompatibleRule { path: String, reason: String },

    /// Two slots with the same name in one group
    #[error("Duplicate slot name: {0}")]
    DuplicateSlot(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("holder.email", "Email is required");
        errors.insert("holder.email", "Enter a valid email address");
        assert_eq!(errors.get("holder.email"), Some("Email is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_any_under() {
        let errors = FieldErrors::single("holder.legalAddress.city", "City is required");
        assert!(errors.any_under("holder.legalAddress"));
        assert!(errors.any_under("holder.legalAddress.city"));
        assert!(!errors.any_under("holder.legal"));
        assert!(!errors.any_under("holder.mailingAddress"));
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let errors = FieldErrors::single("questionId", UNSUPPORTED_QUESTION);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"questionId": "Unsupported question"}));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(3), Ok(3));
        assert!(FieldErrors::single("a", "b").into_result(3).is_err());
    }
}
