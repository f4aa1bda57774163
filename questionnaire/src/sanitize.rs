//! Visibility-driven clearing.
//!
//! Every condition is evaluated against the input tree before anything is
//! cleared, so the outcome never depends on rule order. Schemas keep this
//! idempotent by writing each condition in terms of fields it cannot clear
//! (a nested question's condition includes its ancestors' conditions).

use tracing::debug;

use crate::context::RuleEnv;
use crate::schema::StepSchema;
use crate::tree::{FieldTree, FieldValue};

/// Reset every field whose precondition is false and enforce collection exclusions.
pub fn sanitize(schema: &StepSchema, tree: &FieldTree, env: &RuleEnv<'_>) -> FieldTree {
    let hidden = schema
        .questions()
        .iter()
        .filter(|q| !q.visible_when.evaluate(tree, env))
        .map(|q| q.path);
    let cleared_by_rules = schema
        .clear_rules()
        .iter()
        .filter(|rule| rule.when.evaluate(tree, env))
        .flat_map(|rule| rule.paths.iter().copied());
    let doomed: Vec<&'static str> = hidden.chain(cleared_by_rules).collect();

    let mut out = tree.clone();
    for path in doomed {
        if out.clear(path) {
            debug!(step = %schema.name(), path = %path, "Cleared stale field");
        }
    }

    for exclusion in schema.exclusions() {
        let controlling = out.codes(exclusion.controlling).to_vec();
        if let Some(FieldValue::Codes(dependent)) = out.get_mut(exclusion.dependent) {
            let before = dependent.len();
            dependent.retain(|code| !controlling.contains(code));
            if dependent.len() != before {
                debug!(
                    step = %schema.name(),
                    path = %exclusion.dependent,
                    removed = before - dependent.len(),
                    "Removed codes duplicated by controlling collection"
                );
            }
        }
    }
    out
}
