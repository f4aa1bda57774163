//! Order-independent validation of a whole step.
//!
//! Re-runs the rule of every visible question against the tree, then the
//! completion-only rules. An empty result is what marks a step complete.

use tracing::debug;

use crate::condition::Condition;
use crate::context::RuleEnv;
use crate::errors::FieldErrors;
use crate::rules::{CheckCtx, PhotoIdRule};
use crate::schema::StepSchema;
use crate::tree::FieldTree;

pub const DOCUMENTARY_ID_MESSAGE: &str = "At least one unexpired photo ID is required";
pub const ENTITY_COUNTRY_MESSAGE: &str = "An entity account may list only one country";

/// Checks that only make sense once the whole step is filled in.
#[derive(Debug, Clone)]
pub enum CompletionRule {
    /// When `when` holds, at least one of the photo-ID `blocks` must be
    /// complete and unexpired. Reported at the first block.
    DocumentaryId {
        blocks: Vec<&'static str>,
        when: Condition,
    },
    /// While `entity_when` holds, the primary and additional country
    /// collections together may list at most
    /// `policy.entity_max_primary_citizenships` codes.
    EntityCountries {
        primary: &'static str,
        additional: &'static str,
        entity_when: Condition,
    },
}

impl CompletionRule {
    /// Field paths this rule reads.
    pub fn paths(&self) -> Vec<&'static str> {
        match self {
            CompletionRule::DocumentaryId { blocks, when } => {
                let mut paths = blocks.clone();
                paths.extend(when.paths());
                paths
            }
            CompletionRule::EntityCountries {
                primary,
                additional,
                entity_when,
            } => {
                let mut paths = vec![*primary, *additional];
                paths.extend(entity_when.paths());
                paths
            }
        }
    }

    fn check(&self, tree: &FieldTree, cx: &CheckCtx<'_>, errors: &mut FieldErrors) {
        match self {
            CompletionRule::DocumentaryId { blocks, when } => {
                if !when.evaluate(tree, &cx.env) {
                    return;
                }
                let photo_id = PhotoIdRule::new("Photo ID");
                let satisfied = blocks.iter().any(|path| {
                    tree.get(path)
                        .is_some_and(|block| photo_id.is_complete(path, block, cx))
                });
                if let (false, Some(first)) = (satisfied, blocks.first()) {
                    errors.insert(*first, DOCUMENTARY_ID_MESSAGE);
                }
            }
            CompletionRule::EntityCountries {
                primary,
                additional,
                entity_when,
            } => {
                if !entity_when.evaluate(tree, &cx.env) {
                    return;
                }
                let total = tree.codes(primary).len() + tree.codes(additional).len();
                if total > cx.env.config.policy.entity_max_primary_citizenships {
                    errors.insert(*primary, ENTITY_COUNTRY_MESSAGE);
                }
            }
        }
    }
}

/// Every error that blocks completion of a sanitized tree.
pub fn validate_completion(schema: &StepSchema, tree: &FieldTree, env: &RuleEnv<'_>) -> FieldErrors {
    let cx = CheckCtx {
        env: *env,
        tree: Some(tree),
    };
    let mut errors = FieldErrors::new();
    for question in schema.questions() {
        if !question.visible_when.evaluate(tree, env) {
            continue;
        }
        let Some(value) = tree.get(question.path) else {
            continue;
        };
        let mut scratch = value.clone();
        question.rule.check(question.path, &mut scratch, &cx, &mut errors);
    }
    for rule in schema.completion_rules() {
        rule.check(tree, &cx, &mut errors);
    }
    debug!(step = %schema.name(), errors = errors.len(), "Validated step completion");
    errors
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::context::{ContextFlag, ValidationContext};
    use crate::normalize::normalize;
    use crate::rules::testing::{env, CONFIG};
    use crate::rules::{CodesRule, Rule};
    use crate::schema::Slot;

    const KIND: &[&str] = &["person", "entity"];
    const ID_TYPES: &[&str] = &["passport", "driversLicense"];

    fn schema() -> StepSchema {
        StepSchema::builder("demo", "step1")
            .slot(Slot::group(
                "holder",
                vec![
                    Slot::choice("kind", KIND),
                    Slot::text("ssn"),
                    Slot::codes("primary"),
                    Slot::codes("additional"),
                    PhotoIdRule::slot("primaryId", ID_TYPES),
                    PhotoIdRule::slot("secondaryId", ID_TYPES),
                ],
            ))
            .question("holder.kind", Rule::choice("account holder type"))
            .question_when("holder.ssn", Rule::text("SSN"), Condition::selected("holder.kind", "person"))
            .question("holder.primary", Rule::Codes(CodesRule::required("Primary citizenship")))
            .question(
                "holder.additional",
                Rule::Codes(
                    CodesRule::optional("Additional citizenship")
                        .exclusive_of("holder.primary", "primary citizenship"),
                ),
            )
            .question("holder.primaryId", Rule::PhotoId(PhotoIdRule::new("Primary photo ID")))
            .question("holder.secondaryId", Rule::PhotoId(PhotoIdRule::new("Secondary photo ID")))
            .completion(CompletionRule::DocumentaryId {
                blocks: vec!["holder.primaryId", "holder.secondaryId"],
                when: Condition::context(ContextFlag::RequiresDocumentaryId),
            })
            .completion(CompletionRule::EntityCountries {
                primary: "holder.primary",
                additional: "holder.additional",
                entity_when: Condition::selected("holder.kind", "entity"),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_reports_visible_questions_only() {
        let schema = schema();
        let person = normalize(&schema, &json!({"holder": {"kind": {"person": true}, "primary": ["US"]}}));
        let errors = validate_completion(&schema, &person, &env());
        assert_eq!(errors.get("holder.ssn"), Some("SSN is required"));

        let entity = normalize(&schema, &json!({"holder": {"kind": {"entity": true}, "primary": ["US"]}}));
        assert!(validate_completion(&schema, &entity, &env()).is_empty());
    }

    #[test]
    fn test_entity_single_country() {
        let schema = schema();
        let tree = normalize(
            &schema,
            &json!({"holder": {"kind": {"entity": true}, "primary": ["US"], "additional": ["CA"]}}),
        );
        let errors = validate_completion(&schema, &tree, &env());
        assert_eq!(errors.get("holder.primary"), Some(ENTITY_COUNTRY_MESSAGE));
    }

    #[test]
    fn test_documentary_id_when_flagged() {
        let schema = schema();
        let tree = normalize(
            &schema,
            &json!({"holder": {"kind": {"entity": true}, "primary": ["US"]}}),
        );
        let context = ValidationContext {
            requires_documentary_id: true,
            ..ValidationContext::default()
        };
        let flagged = RuleEnv::new(env().today, &context, &CONFIG);
        let errors = validate_completion(&schema, &tree, &flagged);
        assert_eq!(errors.get("holder.primaryId"), Some(DOCUMENTARY_ID_MESSAGE));

        let with_id = normalize(
            &schema,
            &json!({"holder": {
                "kind": {"entity": true},
                "primary": ["US"],
                "secondaryId": {
                    "type": {"passport": true}, "idNumber": "P123", "countryOfIssue": "US",
                    "dateOfIssue": "2020-01-01", "dateOfExpiration": "2030-01-01"
                }
            }}),
        );
        assert!(validate_completion(&schema, &with_id, &flagged).is_empty());
    }
}
