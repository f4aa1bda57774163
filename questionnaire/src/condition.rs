//! Visibility predicates over the field tree.

use chrono::{Datelike, NaiveDate};

use crate::context::{ContextFlag, RuleEnv};
use crate::tree::FieldTree;

/// Condition controlling whether a question (or a clear rule) applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Always holds
    Always,
    /// The choice set at `path` has `option` selected
    Selected {
        path: &'static str,
        option: &'static str,
    },
    /// The choice set at `path` has one of `options` selected
    SelectedAny {
        path: &'static str,
        options: &'static [&'static str],
    },
    /// The date at `path` parses and is younger than the configured adult age
    Minor { path: &'static str },
    /// A validation context flag is set
    Context(ContextFlag),
    /// Logical AND of conditions
    And(Vec<Condition>),
    /// Logical OR of conditions
    Or(Vec<Condition>),
    /// Negation
    Not(Box<Condition>),
}

impl Condition {
    pub fn selected(path: &'static str, option: &'static str) -> Self {
        Condition::Selected { path, option }
    }

    pub fn selected_any(path: &'static str, options: &'static [&'static str]) -> Self {
        Condition::SelectedAny { path, options }
    }

    pub fn minor(path: &'static str) -> Self {
        Condition::Minor { path }
    }

    pub fn context(flag: ContextFlag) -> Self {
        Condition::Context(flag)
    }

    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::Always => other,
            Condition::And(mut all) => {
                all.push(other);
                Condition::And(all)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Or(mut any) => {
                any.push(other);
                Condition::Or(any)
            }
            first => Condition::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Condition::Not(inner) => *inner,
            other => Condition::Not(Box::new(other)),
        }
    }

    /// Evaluate against a tree.
    pub fn evaluate(&self, tree: &FieldTree, env: &RuleEnv<'_>) -> bool {
        match self {
            Condition::Always => true,
            Condition::Selected { path, option } => tree.is_selected(path, option),
            Condition::SelectedAny { path, options } => tree
                .choice(path)
                .and_then(|set| set.selected())
                .is_some_and(|sel| options.iter().any(|o| *o == sel)),
            Condition::Minor { path } => tree
                .text(path)
                .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
                .is_some_and(|dob| age_on(dob, env.today) < i64::from(env.config.dates.adult_age)),
            Condition::Context(flag) => env.context.flag(*flag),
            Condition::And(all) => all.iter().all(|c| c.evaluate(tree, env)),
            Condition::Or(any) => any.iter().any(|c| c.evaluate(tree, env)),
            Condition::Not(inner) => !inner.evaluate(tree, env),
        }
    }

    /// Field paths this condition reads.
    pub fn paths(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);
        out
    }

    fn collect_paths(&self, out: &mut Vec<&'static str>) {
        match self {
            Condition::Always | Condition::Context(_) => {}
            Condition::Selected { path, .. }
            | Condition::SelectedAny { path, .. }
            | Condition::Minor { path } => out.push(*path),
            Condition::And(items) | Condition::Or(items) => {
                items.iter().for_each(|c| c.collect_paths(out))
            }
            Condition::Not(inner) => inner.collect_paths(out),
        }
    }
}

/// Whole years from `dob` to `today`. Negative for future dates.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i64 {
    let mut years = i64::from(today.year() - dob.year());
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::context::ValidationContext;
    use crate::tree::{ChoiceSet, FieldValue};
    use std::collections::BTreeMap;

    fn tree(kind: Option<&str>, dob: Option<&str>) -> FieldTree {
        let mut set = ChoiceSet::new(&["person", "entity"]);
        if let Some(k) = kind {
            set.select(k);
        }
        let mut root = BTreeMap::new();
        root.insert("kind".to_string(), FieldValue::Choice(set));
        root.insert("dob".to_string(), FieldValue::Date(dob.map(String::from)));
        FieldTree::from_root(FieldValue::Group(root))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        assert_eq!(age_on(date(2007, 6, 15), date(2025, 6, 15)), 18);
        assert_eq!(age_on(date(2007, 6, 16), date(2025, 6, 15)), 17);
        assert_eq!(age_on(date(2026, 1, 1), date(2025, 6, 15)), -1);
    }

    #[test]
    fn test_selected_and_negation() {
        let ctx = ValidationContext::default();
        let config = EngineConfig::default();
        let env = RuleEnv::new(date(2025, 6, 15), &ctx, &config);

        let person = Condition::selected("kind", "entity").negate();
        assert!(person.evaluate(&tree(None, None), &env));
        assert!(person.evaluate(&tree(Some("person"), None), &env));
        assert!(!person.evaluate(&tree(Some("entity"), None), &env));

        let any = Condition::selected_any("kind", &["person", "entity"]);
        assert!(!any.evaluate(&tree(None, None), &env));
        assert!(any.evaluate(&tree(Some("entity"), None), &env));
    }

    #[test]
    fn test_minor() {
        let ctx = ValidationContext::default();
        let config = EngineConfig::default();
        let env = RuleEnv::new(date(2025, 6, 15), &ctx, &config);
        let minor = Condition::minor("dob");

        assert!(minor.evaluate(&tree(None, Some("2010-01-01")), &env));
        assert!(!minor.evaluate(&tree(None, Some("1980-01-01")), &env));
        assert!(!minor.evaluate(&tree(None, Some("not-a-date")), &env));
        assert!(!minor.evaluate(&tree(None, None), &env));
    }

    #[test]
    fn test_context_flag() {
        let ctx = ValidationContext {
            requires_joint_owner_signature: true,
            ..Default::default()
        };
        let config = EngineConfig::default();
        let env = RuleEnv::new(date(2025, 6, 15), &ctx, &config);
        let cond = Condition::context(ContextFlag::RequiresJointOwnerSignature);
        assert!(cond.evaluate(&tree(None, None), &env));
    }

    #[test]
    fn test_paths() {
        let cond = Condition::selected("kind", "entity")
            .negate()
            .and(Condition::minor("dob"))
            .or(Condition::context(ContextFlag::IsNonResidentAlien));
        assert_eq!(cond.paths(), vec!["kind", "dob"]);
    }
}
