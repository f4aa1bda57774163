//! Reusable per-question validators.
//!
//! A [`Rule`] checks one value in place: it records path-keyed messages and
//! may normalize the value (for example clearing detail fields of a
//! disclosure answered "no"). The same rule object backs both single-answer
//! validation and full-tree completion, so the two can never disagree.

mod collection;
mod composite;
pub mod formats;
mod scalar;

pub use collection::{CodesRule, EntriesRule};
pub use composite::{
    AtLeastOne, BracketRangeRule, DisclosureRule, ExperienceRule, GroupRule, PhotoIdRule,
    KNOWLEDGE_LEVELS, RANGE_ORDER_MESSAGE,
};
pub use scalar::{ChoiceRule, DateRule, IntegerRule, Temporal, TextFormat, TextRule, YearRule};

use crate::context::RuleEnv;
use crate::errors::FieldErrors;
use crate::schema::{Slot, SlotKind};
use crate::tree::{FieldTree, FieldValue};

/// Inputs available to a rule besides the value under test.
#[derive(Debug, Clone, Copy)]
pub struct CheckCtx<'a> {
    pub env: RuleEnv<'a>,
    /// Current tree for cross-field checks. Absent when an answer is
    /// validated in isolation; cross-field checks are then skipped.
    pub tree: Option<&'a FieldTree>,
}

/// Validation rule for one question.
#[derive(Debug, Clone)]
pub enum Rule {
    Choice(ChoiceRule),
    Text(TextRule),
    Date(DateRule),
    Integer(IntegerRule),
    Year(YearRule),
    Codes(CodesRule),
    Entries(EntriesRule),
    Group(GroupRule),
    Disclosure(DisclosureRule),
    Range(BracketRangeRule),
    PhotoId(PhotoIdRule),
    Experience(ExperienceRule),
}

impl Rule {
    /// Required single choice.
    pub fn choice(label: &'static str) -> Self {
        Rule::Choice(ChoiceRule {
            label,
            required: true,
        })
    }

    /// Choice that may stay unanswered.
    pub fn optional_choice(label: &'static str) -> Self {
        Rule::Choice(ChoiceRule {
            label,
            required: false,
        })
    }

    /// Required free text.
    pub fn text(label: &'static str) -> Self {
        Self::formatted(label, TextFormat::Free)
    }

    pub fn optional_text(label: &'static str) -> Self {
        Rule::Text(TextRule {
            label,
            required: false,
            format: TextFormat::Free,
        })
    }

    /// Required text in a specific format.
    pub fn formatted(label: &'static str, format: TextFormat) -> Self {
        Rule::Text(TextRule {
            label,
            required: true,
            format,
        })
    }

    /// Optional text that must match `format` when present.
    pub fn optional_formatted(label: &'static str, format: TextFormat) -> Self {
        Rule::Text(TextRule {
            label,
            required: false,
            format,
        })
    }

    /// Required date with a temporal constraint.
    pub fn date(label: &'static str, temporal: Temporal) -> Self {
        Rule::Date(DateRule {
            label,
            required: true,
            temporal,
        })
    }

    /// Required non-negative whole number.
    pub fn integer(label: &'static str) -> Self {
        Rule::Integer(IntegerRule {
            label,
            required: true,
            max: None,
        })
    }

    /// Required year between the configured floor and the current year.
    pub fn year(label: &'static str) -> Self {
        Rule::Year(YearRule {
            label,
            required: true,
        })
    }

    /// Check `value` (found at `path`), recording problems in `errors`.
    pub fn check(
        &self,
        path: &str,
        value: &mut FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        match self {
            Rule::Choice(rule) => rule.check(path, value, errors),
            Rule::Text(rule) => rule.check(path, value, cx, errors),
            Rule::Date(rule) => rule.check(path, value, cx, errors),
            Rule::Integer(rule) => rule.check(path, value, errors),
            Rule::Year(rule) => rule.check(path, value, cx, errors),
            Rule::Codes(rule) => rule.check(path, value, cx, errors),
            Rule::Entries(rule) => rule.check(path, value, cx, errors),
            Rule::Group(rule) => rule.check(path, value, cx, errors),
            Rule::Disclosure(rule) => rule.check(path, value, cx, errors),
            Rule::Range(rule) => rule.check(path, value, cx, errors),
            Rule::PhotoId(rule) => rule.check(path, value, cx, errors),
            Rule::Experience(rule) => rule.check(path, value, cx, errors),
        }
    }

    /// Whether this rule can validate values of `slot`'s shape.
    pub fn fits(&self, slot: &Slot) -> Result<(), String> {
        match self {
            Rule::Choice(_) => expect_kind(slot, matches!(slot.kind, SlotKind::Choice(_))),
            Rule::Text(rule) => rule.fits(slot),
            Rule::Date(_) => expect_kind(slot, slot.kind == SlotKind::Date),
            Rule::Integer(_) | Rule::Year(_) => {
                expect_kind(slot, slot.kind == SlotKind::Integer)
            }
            Rule::Codes(_) => expect_kind(slot, slot.kind == SlotKind::Codes),
            Rule::Entries(_) => expect_kind(slot, slot.kind == SlotKind::Entries),
            Rule::Group(rule) => rule.fits(slot),
            Rule::Disclosure(rule) => rule.fits(slot),
            Rule::Range(rule) => rule.fits(slot),
            Rule::PhotoId(rule) => rule.fits(slot),
            Rule::Experience(rule) => rule.fits(slot),
        }
    }
}

pub(crate) fn expect_kind(slot: &Slot, ok: bool) -> Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("slot '{}' has kind {:?}", slot.name, slot.kind))
    }
}

/// Path of a child under `parent`.
pub(crate) fn join(parent: &str, child: &str) -> String {
    format!("{parent}.{child}")
}
