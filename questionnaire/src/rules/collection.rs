//! Collection rules: country code sets and label/value lists.

use std::collections::HashSet;

use super::formats;
use super::{join, CheckCtx};
use crate::errors::FieldErrors;
use crate::tree::FieldValue;

/// A set of 2-letter country codes.
#[derive(Debug, Clone)]
pub struct CodesRule {
    pub label: &'static str,
    pub required: bool,
    /// `(path, label)` of a controlling collection this one may not overlap
    pub exclusive_of: Option<(&'static str, &'static str)>,
}

impl CodesRule {
    pub fn required(label: &'static str) -> Self {
        Self {
            label,
            required: true,
            exclusive_of: None,
        }
    }

    pub fn optional(label: &'static str) -> Self {
        Self {
            label,
            required: false,
            exclusive_of: None,
        }
    }

    pub fn exclusive_of(mut self, path: &'static str, label: &'static str) -> Self {
        self.exclusive_of = Some((path, label));
        self
    }

    pub(crate) fn check(
        &self,
        path: &str,
        value: &FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        let codes = value.as_codes();
        if codes.is_empty() {
            if self.required {
                errors.insert(path, format!("{} is required", self.label));
            }
            return;
        }
        if codes.iter().any(|c| !formats::is_country_code(c)) {
            errors.insert(path, format!("{} must use 2-letter country codes", self.label));
            return;
        }
        let mut seen = HashSet::new();
        if !codes.iter().all(|c| seen.insert(c.as_str())) {
            errors.insert(path, format!("{} lists a country more than once", self.label));
            return;
        }
        let max = cx.env.config.limits.max_citizenships;
        if codes.len() > max {
            errors.insert(path, format!("{} allows at most {max} countries", self.label));
            return;
        }
        if let (Some((other_path, other_label)), Some(tree)) = (self.exclusive_of, cx.tree) {
            let controlling = tree.codes(other_path);
            if codes.iter().any(|c| controlling.contains(c)) {
                errors.insert(path, format!("{} cannot duplicate {other_label}", self.label));
            }
        }
    }
}

/// A dynamic list of label/value pairs.
#[derive(Debug, Clone)]
pub struct EntriesRule {
    pub label: &'static str,
    pub required: bool,
}

impl EntriesRule {
    pub(crate) fn check(
        &self,
        path: &str,
        value: &FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        let entries = value.as_entries();
        if entries.is_empty() {
            if self.required {
                errors.insert(path, format!("{} is required", self.label));
            }
            return;
        }
        let limits = &cx.env.config.limits;
        if entries.len() > limits.max_entries {
            errors.insert(
                path,
                format!("{} allows at most {} entries", self.label, limits.max_entries),
            );
            return;
        }
        for (idx, entry) in entries.iter().enumerate() {
            let entry_path = join(path, &idx.to_string());
            match entry.label.as_deref() {
                None => errors.insert(join(&entry_path, "label"), "Label is required"),
                Some(label) if label.chars().count() > limits.max_text_len => errors.insert(
                    join(&entry_path, "label"),
                    format!("Label must be at most {} characters", limits.max_text_len),
                ),
                Some(_) => {}
            }
            if entry.value.is_none() {
                errors.insert(join(&entry_path, "value"), "Value is required");
            }
        }
    }
}
