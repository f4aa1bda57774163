//! Single-value rules: choices, text, dates and numbers.

use chrono::{Datelike, NaiveDate};

use super::formats;
use super::{expect_kind, CheckCtx};
use crate::errors::FieldErrors;
use crate::schema::{Slot, SlotKind};
use crate::tree::FieldValue;

/// Exactly one option of a choice set.
#[derive(Debug, Clone)]
pub struct ChoiceRule {
    pub label: &'static str,
    pub required: bool,
}

impl ChoiceRule {
    pub(crate) fn check(&self, path: &str, value: &FieldValue, errors: &mut FieldErrors) {
        let chosen = value.as_choice().is_some_and(|set| !set.is_empty());
        if self.required && !chosen {
            errors.insert(path, format!("Choose exactly one {}", self.label));
        }
    }
}

/// Accepted shapes for a text answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Free,
    Email,
    Phone,
    /// 2-letter country code
    Country,
    Ssn,
    Ein,
    /// Street address line; post office boxes rejected
    StreetAddress,
    /// One of a fixed set of keys
    OneOf(&'static [&'static str]),
}

/// A text scalar.
#[derive(Debug, Clone)]
pub struct TextRule {
    pub label: &'static str,
    pub required: bool,
    pub format: TextFormat,
}

impl TextRule {
    pub(crate) fn check(
        &self,
        path: &str,
        value: &FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        let Some(text) = value.as_str() else {
            if self.required {
                errors.insert(path, format!("{} is required", self.label));
            }
            return;
        };

        let max = cx.env.config.limits.max_text_len;
        if text.chars().count() > max {
            errors.insert(path, format!("{} must be at most {max} characters", self.label));
            return;
        }

        let message = match self.format {
            TextFormat::Free => None,
            TextFormat::Email => (!formats::is_email(text)).then_some("Enter a valid email address"),
            TextFormat::Phone => (!formats::is_phone(text)).then_some("Enter a valid phone number"),
            TextFormat::Country => (!formats::is_country_code(text))
                .then_some("Enter a valid 2-letter country code"),
            TextFormat::Ssn => (!formats::is_ssn(text)).then_some("SSN must be 9 digits"),
            TextFormat::Ein => (!formats::is_ein(text)).then_some("EIN must be 9 digits"),
            TextFormat::StreetAddress => formats::mentions_po_box(text)
                .then_some("P.O. Boxes are not allowed for the legal address"),
            TextFormat::OneOf(allowed) => {
                (!allowed.iter().any(|a| *a == text)).then_some("Select a valid option")
            }
        };
        if let Some(message) = message {
            errors.insert(path, message);
        }
    }

    pub(crate) fn fits(&self, slot: &Slot) -> Result<(), String> {
        match self.format {
            TextFormat::Country => expect_kind(
                slot,
                matches!(slot.kind, SlotKind::Country | SlotKind::Text),
            ),
            _ => expect_kind(slot, matches!(slot.kind, SlotKind::Text | SlotKind::Country)),
        }
    }
}

/// Relation a date must have to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    /// Strictly before today
    Past,
    /// Today or earlier
    NotFuture,
    /// Today or later
    NotPast,
    Any,
}

/// A `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone)]
pub struct DateRule {
    pub label: &'static str,
    pub required: bool,
    pub temporal: Temporal,
}

impl DateRule {
    pub(crate) fn check(
        &self,
        path: &str,
        value: &FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        self.parse(path, value.as_str(), cx.env.today, errors);
    }

    /// Check and return the parsed date when it is acceptable.
    pub(crate) fn parse(
        &self,
        path: &str,
        raw: Option<&str>,
        today: NaiveDate,
        errors: &mut FieldErrors,
    ) -> Option<NaiveDate> {
        let Some(raw) = raw else {
            if self.required {
                errors.insert(path, format!("{} is required", self.label));
            }
            return None;
        };
        let parsed = formats::is_date_shape(raw)
            .then(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
            .flatten();
        let Some(date) = parsed else {
            errors.insert(path, format!("{} must be a valid date (YYYY-MM-DD)", self.label));
            return None;
        };
        let message = match self.temporal {
            Temporal::Past if date >= today => Some("must be in the past"),
            Temporal::NotFuture if date > today => Some("cannot be in the future"),
            Temporal::NotPast if date < today => Some("cannot be in the past"),
            _ => None,
        };
        match message {
            Some(message) => {
                errors.insert(path, format!("{} {message}", self.label));
                None
            }
            None => Some(date),
        }
    }
}

/// Non-negative whole number, optionally capped.
#[derive(Debug, Clone)]
pub struct IntegerRule {
    pub label: &'static str,
    pub required: bool,
    pub max: Option<u64>,
}

impl IntegerRule {
    pub(crate) fn check(&self, path: &str, value: &FieldValue, errors: &mut FieldErrors) {
        match (value.as_integer(), self.max) {
            (None, _) if self.required => {
                errors.insert(path, format!("{} is required", self.label));
            }
            (Some(n), Some(max)) if n > max => {
                errors.insert(path, format!("{} must be at most {max}", self.label));
            }
            _ => {}
        }
    }
}

/// A calendar year between the configured floor and the current UTC year.
#[derive(Debug, Clone)]
pub struct YearRule {
    pub label: &'static str,
    pub required: bool,
}

impl YearRule {
    pub(crate) fn check(
        &self,
        path: &str,
        value: &FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        let min = cx.env.config.dates.min_since_year;
        let max = u64::try_from(cx.env.today.year()).unwrap_or(0);
        match value.as_integer() {
            None if self.required => {
                errors.insert(path, format!("{} is required", self.label));
            }
            Some(year) if year < min || year > max => {
                errors.insert(path, format!("{} must be between {min} and {max}", self.label));
            }
            _ => {}
        }
    }
}
