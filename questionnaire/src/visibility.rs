//! Which questions apply to the current tree, in master order.

use crate::context::RuleEnv;
use crate::schema::{QuestionId, StepSchema};
use crate::tree::FieldTree;

/// Ordered subset of the master question list whose precondition holds.
pub fn visible_questions(schema: &StepSchema, tree: &FieldTree, env: &RuleEnv<'_>) -> Vec<QuestionId> {
    schema
        .questions()
        .iter()
        .filter(|q| q.visible_when.evaluate(tree, env))
        .map(|q| q.id.clone())
        .collect()
}

/// Clamp an external cursor into `[0, len - 1]`, or 0 for an empty list.
pub fn clamp_index(index: i64, visible: &[QuestionId]) -> usize {
    if index <= 0 {
        return 0;
    }
    let last = visible.len().saturating_sub(1);
    usize::try_from(index).unwrap_or(usize::MAX).min(last)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::condition::Condition;
    use crate::normalize::normalize;
    use crate::rules::testing::env;
    use crate::rules::Rule;
    use crate::schema::Slot;

    const KIND: &[&str] = &["person", "entity"];

    fn schema() -> StepSchema {
        StepSchema::builder("demo", "step1")
            .slot(Slot::group(
                "holder",
                vec![Slot::choice("kind", KIND), Slot::text("ssn"), Slot::text("entityName")],
            ))
            .question("holder.kind", Rule::choice("account holder type"))
            .question_when("holder.ssn", Rule::text("SSN"), Condition::selected("holder.kind", "person"))
            .question_when(
                "holder.entityName",
                Rule::text("Entity name"),
                Condition::selected("holder.kind", "entity"),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_follows_controlling_choice() {
        let schema = schema();
        let person = normalize(&schema, &json!({"holder": {"kind": {"person": true}}}));
        assert_eq!(
            visible_questions(&schema, &person, &env()),
            vec![QuestionId::new("step1.holder.kind"), QuestionId::new("step1.holder.ssn")]
        );

        let unanswered = schema.default_tree();
        assert_eq!(visible_questions(&schema, &unanswered, &env()).len(), 1);
    }

    #[test]
    fn test_clamp_index() {
        let ids = vec![QuestionId::new("a"), QuestionId::new("b"), QuestionId::new("c")];
        assert_eq!(clamp_index(-4, &ids), 0);
        assert_eq!(clamp_index(1, &ids), 1);
        assert_eq!(clamp_index(17, &ids), 2);
        assert_eq!(clamp_index(5, &[]), 0);
        assert_eq!(clamp_index(i64::MAX, &ids), 2);
    }
}
