//! Grouped questions: one answer covering a whole block.
//!
//! Every rule here validates all members together and reports each problem
//! at its full sub-path, so one rejected answer can light up every bad
//! input at once.

use super::scalar::{DateRule, Temporal, TextFormat, TextRule, YearRule};
use super::{expect_kind, join, CheckCtx, Rule};
use crate::errors::FieldErrors;
use crate::schema::{Slot, SlotKind};
use crate::tree::FieldValue;

pub const RANGE_ORDER_MESSAGE: &str = "From range must be less than or equal to the To range";

/// Knowledge levels of an experience record, in ascending order.
pub const KNOWLEDGE_LEVELS: &[&str] = &["none", "limited", "good", "extensive"];

const YES: &str = "yes";

/// Requires at least one of several members to be filled.
#[derive(Debug, Clone)]
pub struct AtLeastOne {
    pub members: &'static [&'static str],
    pub message: &'static str,
}

/// Fixed block whose members each carry their own rule.
#[derive(Debug, Clone)]
pub struct GroupRule {
    pub members: Vec<(&'static str, Rule)>,
    pub at_least_one: Option<AtLeastOne>,
}

impl GroupRule {
    pub fn new(members: Vec<(&'static str, Rule)>) -> Self {
        Self {
            members,
            at_least_one: None,
        }
    }

    pub fn at_least_one(mut self, members: &'static [&'static str], message: &'static str) -> Self {
        self.at_least_one = Some(AtLeastOne { members, message });
        self
    }

    pub(crate) fn check(
        &self,
        path: &str,
        value: &mut FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        for (name, rule) in &self.members {
            if let Some(child) = value.child_mut(name) {
                rule.check(&join(path, name), child, cx, errors);
            }
        }
        if let Some(constraint) = &self.at_least_one {
            let any = constraint
                .members
                .iter()
                .any(|name| value.child(name).is_some_and(|v| !v.is_empty()));
            if !any {
                errors.insert(path, constraint.message);
            }
        }
    }

    pub(crate) fn fits(&self, slot: &Slot) -> Result<(), String> {
        expect_kind(slot, matches!(slot.kind, SlotKind::Group(_)))?;
        for (name, rule) in &self.members {
            let child = member(slot, name)?;
            rule.fits(child)?;
        }
        if let Some(constraint) = &self.at_least_one {
            for name in constraint.members {
                member(slot, name)?;
            }
        }
        Ok(())
    }
}

/// A yes/no toggle whose detail fields are required only on "yes".
#[derive(Debug, Clone)]
pub struct DisclosureRule {
    pub label: &'static str,
    /// Member holding the yes/no choice set
    pub toggle: &'static str,
    pub details: Vec<(&'static str, Rule)>,
}

impl DisclosureRule {
    pub fn new(label: &'static str, details: Vec<(&'static str, Rule)>) -> Self {
        Self {
            label,
            toggle: "answer",
            details,
        }
    }

    pub(crate) fn check(
        &self,
        path: &str,
        value: &mut FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        let toggle = value.child(self.toggle).and_then(FieldValue::as_choice);
        let answered_yes = match toggle.and_then(|set| set.selected()) {
            None => {
                errors.insert(join(path, self.toggle), format!("Choose yes or no for {}", self.label));
                return;
            }
            Some(selected) => selected == YES,
        };
        for (name, rule) in &self.details {
            let Some(child) = value.child_mut(name) else {
                continue;
            };
            if answered_yes {
                rule.check(&join(path, name), child, cx, errors);
            } else {
                child.clear();
            }
        }
    }

    pub(crate) fn fits(&self, slot: &Slot) -> Result<(), String> {
        let toggle = member(slot, self.toggle)?;
        match &toggle.kind {
            SlotKind::Choice(options) if options.contains(&YES) => {}
            _ => return Err(format!("toggle '{}' must be a choice with a yes option", self.toggle)),
        }
        for (name, rule) in &self.details {
            rule.fits(member(slot, name)?)?;
        }
        Ok(())
    }
}

/// An ordered bracket range (`fromBracket` ≤ `toBracket` by index).
#[derive(Debug, Clone)]
pub struct BracketRangeRule {
    pub label: &'static str,
    pub brackets: &'static [&'static str],
    /// `(path, label)` of a range whose upper bracket this one may not exceed
    pub not_above: Option<(&'static str, &'static str)>,
}

impl BracketRangeRule {
    pub const FROM: &'static str = "fromBracket";
    pub const TO: &'static str = "toBracket";

    pub fn new(label: &'static str, brackets: &'static [&'static str]) -> Self {
        Self {
            label,
            brackets,
            not_above: None,
        }
    }

    pub fn not_above(mut self, path: &'static str, label: &'static str) -> Self {
        self.not_above = Some((path, label));
        self
    }

    /// Slot shape this rule validates.
    pub fn slot(name: &'static str) -> Slot {
        Slot::group(name, vec![Slot::text(Self::FROM), Slot::text(Self::TO)])
    }

    fn index(&self, key: Option<&str>) -> Option<usize> {
        key.and_then(|k| self.brackets.iter().position(|b| *b == k))
    }

    fn bound(
        &self,
        path: &str,
        member: &str,
        which: &str,
        value: &FieldValue,
        errors: &mut FieldErrors,
    ) -> Option<usize> {
        let key = value.child(member).and_then(FieldValue::as_str);
        let idx = self.index(key);
        match (key, idx) {
            (None, _) => errors.insert(join(path, member), format!("Select a {which} range")),
            (Some(_), None) => errors.insert(join(path, member), "Select a valid range"),
            _ => {}
        }
        idx
    }

    pub(crate) fn check(
        &self,
        path: &str,
        value: &mut FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        let from = self.bound(path, Self::FROM, "From", value, errors);
        let to = self.bound(path, Self::TO, "To", value, errors);
        let (Some(from), Some(to)) = (from, to) else {
            return;
        };
        if from > to {
            errors.insert(join(path, Self::TO), RANGE_ORDER_MESSAGE);
            return;
        }
        if let (Some((other, other_label)), Some(tree)) = (self.not_above, cx.tree) {
            let ceiling = self.index(tree.text(&join(other, Self::TO)));
            if ceiling.is_some_and(|ceiling| to > ceiling) {
                errors.insert(
                    join(path, Self::TO),
                    format!("{} cannot exceed {other_label}", self.label),
                );
            }
        }
    }

    pub(crate) fn fits(&self, slot: &Slot) -> Result<(), String> {
        for name in [Self::FROM, Self::TO] {
            let bound = member(slot, name)?;
            expect_kind(bound, bound.kind == SlotKind::Text)?;
        }
        Ok(())
    }
}

/// A documentary photo ID: empty is allowed, partial is not.
#[derive(Debug, Clone)]
pub struct PhotoIdRule {
    pub label: &'static str,
}

impl PhotoIdRule {
    pub const TYPE: &'static str = "type";
    pub const NUMBER: &'static str = "idNumber";
    pub const COUNTRY: &'static str = "countryOfIssue";
    pub const ISSUED: &'static str = "dateOfIssue";
    pub const EXPIRES: &'static str = "dateOfExpiration";

    pub fn new(label: &'static str) -> Self {
        Self { label }
    }

    /// Slot shape this rule validates.
    pub fn slot(name: &'static str, id_types: &'static [&'static str]) -> Slot {
        Slot::group(
            name,
            vec![
                Slot::choice(Self::TYPE, id_types),
                Slot::text(Self::NUMBER),
                Slot::country(Self::COUNTRY),
                Slot::date(Self::ISSUED),
                Slot::date(Self::EXPIRES),
            ],
        )
    }

    /// Whether `value` is a fully filled, valid, unexpired ID.
    pub fn is_complete(&self, path: &str, value: &FieldValue, cx: &CheckCtx<'_>) -> bool {
        if value.is_empty() {
            return false;
        }
        let mut scratch = value.clone();
        let mut errors = FieldErrors::new();
        self.check(path, &mut scratch, cx, &mut errors);
        errors.is_empty()
    }

    pub(crate) fn check(
        &self,
        path: &str,
        value: &mut FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        if value.is_empty() {
            return;
        }
        let child = |name: &str| value.child(name).cloned().unwrap_or(FieldValue::Text(None));

        if !child(Self::TYPE).as_choice().is_some_and(|set| !set.is_empty()) {
            errors.insert(join(path, Self::TYPE), "ID type is required");
        }
        TextRule {
            label: "ID number",
            required: true,
            format: TextFormat::Free,
        }
        .check(&join(path, Self::NUMBER), &child(Self::NUMBER), cx, errors);
        TextRule {
            label: "Country of issue",
            required: true,
            format: TextFormat::Country,
        }
        .check(&join(path, Self::COUNTRY), &child(Self::COUNTRY), cx, errors);

        let issued = DateRule {
            label: "Date of issue",
            required: true,
            temporal: Temporal::NotFuture,
        }
        .parse(
            &join(path, Self::ISSUED),
            child(Self::ISSUED).as_str(),
            cx.env.today,
            errors,
        );
        let expires = DateRule {
            label: "Date of expiration",
            required: true,
            temporal: Temporal::NotPast,
        }
        .parse(
            &join(path, Self::EXPIRES),
            child(Self::EXPIRES).as_str(),
            cx.env.today,
            errors,
        );
        if let (Some(issued), Some(expires)) = (issued, expires) {
            if issued > expires {
                errors.insert(
                    join(path, Self::EXPIRES),
                    "Date of expiration must be on or after the date of issue",
                );
            }
        }
    }

    pub(crate) fn fits(&self, slot: &Slot) -> Result<(), String> {
        let kinds: [(&str, fn(&SlotKind) -> bool); 5] = [
            (Self::TYPE, |k| matches!(k, SlotKind::Choice(_))),
            (Self::NUMBER, |k| *k == SlotKind::Text),
            (Self::COUNTRY, |k| matches!(k, SlotKind::Country | SlotKind::Text)),
            (Self::ISSUED, |k| *k == SlotKind::Date),
            (Self::EXPIRES, |k| *k == SlotKind::Date),
        ];
        for (name, ok) in kinds {
            let child = member(slot, name)?;
            expect_kind(child, ok(&child.kind))?;
        }
        Ok(())
    }
}

/// Per-investment-type knowledge and experience records.
///
/// Each key holds `{level, sinceYear}`; the optional "other" key also holds
/// a free-text `label`. A level of `none` needs nothing else and clears the
/// rest of the record.
#[derive(Debug, Clone)]
pub struct ExperienceRule {
    pub keys: &'static [&'static str],
    pub other_key: Option<&'static str>,
}

impl ExperienceRule {
    pub const LEVEL: &'static str = "level";
    pub const SINCE: &'static str = "sinceYear";
    pub const LABEL: &'static str = "label";

    pub fn new(keys: &'static [&'static str], other_key: Option<&'static str>) -> Self {
        Self { keys, other_key }
    }

    /// Slot shape this rule validates.
    pub fn slot(
        name: &'static str,
        keys: &'static [&'static str],
        other_key: Option<&'static str>,
    ) -> Slot {
        Slot::group(
            name,
            keys.iter()
                .map(|key| {
                    let mut members = vec![
                        Slot::choice(Self::LEVEL, KNOWLEDGE_LEVELS),
                        Slot::integer(Self::SINCE),
                    ];
                    if other_key == Some(*key) {
                        members.push(Slot::text(Self::LABEL));
                    }
                    Slot::group(*key, members)
                })
                .collect(),
        )
    }

    pub(crate) fn check(
        &self,
        path: &str,
        value: &mut FieldValue,
        cx: &CheckCtx<'_>,
        errors: &mut FieldErrors,
    ) {
        for key in self.keys {
            let Some(record) = value.child_mut(key) else {
                continue;
            };
            let record_path = join(path, key);
            let level = record
                .child(Self::LEVEL)
                .and_then(FieldValue::as_choice)
                .and_then(|set| set.selected())
                .map(str::to_string);
            let is_other = self.other_key == Some(*key);
            match level.as_deref() {
                None => errors.insert(
                    join(&record_path, Self::LEVEL),
                    "Choose exactly one knowledge level",
                ),
                Some("none") => {
                    for name in [Self::SINCE, Self::LABEL] {
                        if let Some(child) = record.child_mut(name) {
                            child.clear();
                        }
                    }
                }
                Some(_) => {
                    if let Some(since) = record.child(Self::SINCE) {
                        YearRule {
                            label: "Since year",
                            required: true,
                        }
                        .check(&join(&record_path, Self::SINCE), since, cx, errors);
                    }
                    if is_other {
                        if let Some(label) = record.child(Self::LABEL) {
                            TextRule {
                                label: "Investment type",
                                required: true,
                                format: TextFormat::Free,
                            }
                            .check(&join(&record_path, Self::LABEL), label, cx, errors);
                        }
                    }
                }
            }
        }
    }

    pub(crate) fn fits(&self, slot: &Slot) -> Result<(), String> {
        for key in self.keys {
            let record = member(slot, key)?;
            match &member(record, Self::LEVEL)?.kind {
                SlotKind::Choice(_) => {}
                other => return Err(format!("'{key}.level' has kind {other:?}")),
            }
            expect_kind(record, member(record, Self::SINCE)?.kind == SlotKind::Integer)?;
            if self.other_key == Some(*key) {
                member(record, Self::LABEL)?;
            }
        }
        Ok(())
    }
}

fn member<'s>(slot: &'s Slot, name: &str) -> Result<&'s Slot, String> {
    slot.child(name)
        .ok_or_else(|| format!("slot '{}' has no member '{name}'", slot.name))
}
