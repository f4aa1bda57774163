//! Declarative step schema.
//!
//! A step is data: the slot tree (shape and defaults), the ordered question
//! catalog (path, rule, visibility), additional clearing rules, collection
//! exclusions and completion-only rules. [`StepSchema::builder`] checks the
//! pieces fit together before any request is served.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::completion::CompletionRule;
use crate::condition::Condition;
use crate::errors::SchemaError;
use crate::rules::Rule;
use crate::tree::{ChoiceSet, FieldTree, FieldValue};

/// Shape of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKind {
    /// Mutually exclusive options
    Choice(&'static [&'static str]),
    /// Free text
    Text,
    /// 2-letter country code, uppercased
    Country,
    /// `YYYY-MM-DD`
    Date,
    /// Non-negative whole number
    Integer,
    /// Collection of 2-letter country codes
    Codes,
    /// Dynamic label/value list
    Entries,
    /// Fixed named children
    Group(Vec<Slot>),
}

/// A named slot in the field tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: &'static str,
    pub kind: SlotKind,
}

impl Slot {
    pub fn choice(name: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            name,
            kind: SlotKind::Choice(options),
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Text,
        }
    }

    pub fn country(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Country,
        }
    }

    pub fn date(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Date,
        }
    }

    pub fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Integer,
        }
    }

    pub fn codes(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Codes,
        }
    }

    pub fn entries(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Entries,
        }
    }

    pub fn group(name: &'static str, children: Vec<Slot>) -> Self {
        Self {
            name,
            kind: SlotKind::Group(children),
        }
    }

    /// Child slot by name (groups only).
    pub fn child(&self, name: &str) -> Option<&Slot> {
        match &self.kind {
            SlotKind::Group(children) => children.iter().find(|c| c.name == name),
            _ => None,
        }
    }

    /// Empty value of this slot's shape.
    pub fn default_value(&self) -> FieldValue {
        match &self.kind {
            SlotKind::Choice(options) => FieldValue::Choice(ChoiceSet::new(options)),
            SlotKind::Text | SlotKind::Country => FieldValue::Text(None),
            SlotKind::Date => FieldValue::Date(None),
            SlotKind::Integer => FieldValue::Integer(None),
            SlotKind::Codes => FieldValue::Codes(Vec::new()),
            SlotKind::Entries => FieldValue::Entries(Vec::new()),
            SlotKind::Group(children) => FieldValue::Group(
                children
                    .iter()
                    .map(|c| (c.name.to_string(), c.default_value()))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }
}

/// Stable, dot-namespaced question identifier (`step3.holder.kind`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for QuestionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for QuestionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One addressable question.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: QuestionId,
    /// Field path the answer is written to (a scalar, choice set or block)
    pub path: &'static str,
    pub rule: Rule,
    pub visible_when: Condition,
}

/// Clears `paths` whenever `when` holds.
#[derive(Debug, Clone)]
pub struct ClearRule {
    pub when: Condition,
    pub paths: Vec<&'static str>,
}

/// The `dependent` code collection never holds a code present in `controlling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exclusion {
    pub controlling: &'static str,
    pub dependent: &'static str,
}

/// Complete definition of one onboarding step.
#[derive(Debug, Clone)]
pub struct StepSchema {
    name: &'static str,
    prefix: &'static str,
    slots: Vec<Slot>,
    questions: Vec<Question>,
    clear_rules: Vec<ClearRule>,
    exclusions: Vec<Exclusion>,
    completion_rules: Vec<CompletionRule>,
}

impl StepSchema {
    /// Start a schema. Question ids become `{prefix}.{path}`.
    pub fn builder(name: &'static str, prefix: &'static str) -> StepSchemaBuilder {
        StepSchemaBuilder {
            schema: StepSchema {
                name,
                prefix,
                slots: Vec::new(),
                questions: Vec::new(),
                clear_rules: Vec::new(),
                exclusions: Vec::new(),
                completion_rules: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Master question order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn clear_rules(&self) -> &[ClearRule] {
        &self.clear_rules
    }

    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    pub fn completion_rules(&self) -> &[CompletionRule] {
        &self.completion_rules
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Position of a question in the master order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    /// Slot addressed by a dotted path.
    pub fn slot_at(&self, path: &str) -> Option<&Slot> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut slot = self.slots.iter().find(|s| s.name == first)?;
        for seg in segments {
            slot = slot.child(seg)?;
        }
        Some(slot)
    }

    /// A structurally complete tree holding only defaults.
    pub fn default_tree(&self) -> FieldTree {
        FieldTree::from_root(FieldValue::Group(
            self.slots
                .iter()
                .map(|s| (s.name.to_string(), s.default_value()))
                .collect(),
        ))
    }

    fn check(&self) -> Result<(), SchemaError> {
        check_slot_names("", &self.slots)?;

        let mut ids = HashSet::new();
        for q in &self.questions {
            if !ids.insert(q.id.as_str()) {
                return Err(SchemaError::DuplicateQuestion(q.id.to_string()));
            }
            let slot = self.resolve(q.path)?;
            q.rule
                .fits(slot)
                .map_err(|reason| SchemaError::IncompatibleRule {
                    path: q.path.to_string(),
                    reason,
                })?;
            for path in q.visible_when.paths() {
                self.resolve(path)?;
            }
        }

        for rule in &self.clear_rules {
            for path in rule.when.paths().into_iter().chain(rule.paths.iter().copied()) {
                self.resolve(path)?;
            }
        }

        for ex in &self.exclusions {
            for path in [ex.controlling, ex.dependent] {
                if self.resolve(path)?.kind != SlotKind::Codes {
                    return Err(SchemaError::IncompatibleRule {
                        path: path.to_string(),
                        reason: "exclusions need code collections".to_string(),
                    });
                }
            }
        }

        for rule in &self.completion_rules {
            for path in rule.paths() {
                self.resolve(path)?;
            }
        }

        Ok(())
    }

    fn resolve(&self, path: &str) -> Result<&Slot, SchemaError> {
        self.slot_at(path)
            .ok_or_else(|| SchemaError::UnknownPath(path.to_string()))
    }
}

fn check_slot_names(parent: &str, slots: &[Slot]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for slot in slots {
        let path = if parent.is_empty() {
            slot.name.to_string()
        } else {
            format!("{parent}.{}", slot.name)
        };
        if !seen.insert(slot.name) {
            return Err(SchemaError::DuplicateSlot(path));
        }
        if let SlotKind::Group(children) = &slot.kind {
            check_slot_names(&path, children)?;
        }
    }
    Ok(())
}

/// Assembles and checks a [`StepSchema`].
pub struct StepSchemaBuilder {
    schema: StepSchema,
}

impl StepSchemaBuilder {
    /// Add a top-level slot.
    pub fn slot(mut self, slot: Slot) -> Self {
        self.schema.slots.push(slot);
        self
    }

    /// Append an always-visible question.
    pub fn question(self, path: &'static str, rule: Rule) -> Self {
        self.question_when(path, rule, Condition::Always)
    }

    /// Append a question shown only while `visible_when` holds.
    pub fn question_when(mut self, path: &'static str, rule: Rule, visible_when: Condition) -> Self {
        let id = QuestionId(format!("{}.{}", self.schema.prefix, path));
        self.schema.questions.push(Question {
            id,
            path,
            rule,
            visible_when,
        });
        self
    }

    /// Clear `paths` whenever `when` holds.
    pub fn clear_when(mut self, when: Condition, paths: &[&'static str]) -> Self {
        self.schema.clear_rules.push(ClearRule {
            when,
            paths: paths.to_vec(),
        });
        self
    }

    pub fn exclusion(mut self, controlling: &'static str, dependent: &'static str) -> Self {
        self.schema.exclusions.push(Exclusion {
            controlling,
            dependent,
        });
        self
    }

    pub fn completion(mut self, rule: CompletionRule) -> Self {
        self.schema.completion_rules.push(rule);
        self
    }

    pub fn build(self) -> Result<StepSchema, SchemaError> {
        self.schema.check()?;
        tracing::debug!(
            step = %self.schema.name,
            questions = self.schema.questions.len(),
            "Built step schema"
        );
        Ok(self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, TextFormat};

    const KIND: &[&str] = &["person", "entity"];

    fn slots() -> Slot {
        Slot::group(
            "holder",
            vec![
                Slot::choice("kind", KIND),
                Slot::text("email"),
                Slot::codes("primary"),
                Slot::codes("additional"),
            ],
        )
    }

    #[test]
    fn test_builder_assigns_prefixed_ids() {
        let schema = StepSchema::builder("demo", "step1")
            .slot(slots())
            .question("holder.kind", Rule::choice("account holder type"))
            .question("holder.email", Rule::formatted("Email", TextFormat::Email))
            .build()
            .unwrap();
        let ids: Vec<_> = schema.questions().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["step1.holder.kind", "step1.holder.email"]);
        assert_eq!(schema.position("step1.holder.email"), Some(1));
        assert!(schema.question("holder.email").is_none());
    }

    #[test]
    fn test_default_tree_is_complete() {
        let schema = StepSchema::builder("demo", "step1").slot(slots()).build().unwrap();
        let tree = schema.default_tree();
        assert!(tree.choice("holder.kind").is_some());
        assert_eq!(tree.text("holder.email"), None);
        assert!(tree.codes("holder.primary").is_empty());
    }

    #[test]
    fn test_rejects_unknown_question_path() {
        let err = StepSchema::builder("demo", "step1")
            .slot(slots())
            .question("holder.phone", Rule::text("Phone"))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::UnknownPath("holder.phone".to_string()));
    }

    #[test]
    fn test_rejects_duplicate_question() {
        let err = StepSchema::builder("demo", "step1")
            .slot(slots())
            .question("holder.email", Rule::text("Email"))
            .question("holder.email", Rule::text("Email"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateQuestion(_)));
    }

    #[test]
    fn test_rejects_mismatched_rule() {
        let err = StepSchema::builder("demo", "step1")
            .slot(slots())
            .question("holder.email", Rule::choice("email"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::IncompatibleRule { .. }));
    }

    #[test]
    fn test_rejects_duplicate_slot() {
        let err = StepSchema::builder("demo", "step1")
            .slot(Slot::group("holder", vec![Slot::text("a"), Slot::text("a")]))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateSlot("holder.a".to_string()));
    }

    #[test]
    fn test_rejects_exclusion_on_text() {
        let err = StepSchema::builder("demo", "step1")
            .slot(slots())
            .exclusion("holder.primary", "holder.email")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::IncompatibleRule { .. }));
    }
}
