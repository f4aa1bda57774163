//! Read, write and completion pipelines for one step.
//!
//! [`QuestionnaireEngine`] binds a [`StepSchema`] to a clock and a config.
//! Every entry point is total: stored data is normalized and sanitized on
//! the way in, and semantic problems come back as [`FieldErrors`].

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::answer::Answer;
use crate::clock::{Clock, SystemClock};
use crate::completion;
use crate::config::EngineConfig;
use crate::context::{RuleEnv, ValidationContext};
use crate::errors::{FieldErrors, QUESTION_ID_PATH, UNSUPPORTED_QUESTION};
use crate::normalize;
use crate::rules::CheckCtx;
use crate::sanitize;
use crate::schema::{QuestionId, StepSchema};
use crate::tree::{FieldTree, FieldValue};
use crate::visibility::{self, clamp_index};

/// Message for answers to questions hidden by the current tree.
pub const NOT_APPLICABLE: &str = "Question is not currently applicable";

/// Validated value ready to apply, or the reasons it was refused.
pub type AnswerResult = Result<FieldValue, FieldErrors>;

/// Completion state of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    /// No completion errors remain
    Completed,
    /// At least one completion error remains
    InProgress,
}

/// What the caller needs to render a step.
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    /// Normalized, sanitized tree
    pub tree: FieldTree,
    /// Visible questions in master order
    pub visible: Vec<QuestionId>,
    /// Cursor clamped into `visible`
    pub index: usize,
    /// Question under the cursor; `None` when nothing is visible
    pub current: Option<QuestionId>,
}

/// Result of a single-question write.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Answer applied; persist `tree` and advance to `next_index`
    Accepted {
        tree: Value,
        visible: Vec<QuestionId>,
        next_index: usize,
    },
    /// Answer refused; stored data is unchanged
    Rejected { field_errors: FieldErrors },
}

impl WriteOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, WriteOutcome::Accepted { .. })
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            WriteOutcome::Rejected { field_errors } => Some(field_errors),
            WriteOutcome::Accepted { .. } => None,
        }
    }
}

/// The generic questionnaire interpreter for one step schema.
#[derive(Clone)]
pub struct QuestionnaireEngine {
    schema: Arc<StepSchema>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl QuestionnaireEngine {
    /// Engine on the system clock with default config.
    pub fn new(schema: impl Into<Arc<StepSchema>>) -> Self {
        Self {
            schema: schema.into(),
            clock: Arc::new(SystemClock),
            config: EngineConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn schema(&self) -> &StepSchema {
        &self.schema
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn env<'a>(&'a self, ctx: &'a ValidationContext) -> RuleEnv<'a> {
        RuleEnv::new(self.clock.today(), ctx, &self.config)
    }

    /// Tree holding only defaults.
    pub fn empty_tree(&self) -> FieldTree {
        self.schema.default_tree()
    }

    pub fn normalize(&self, raw: &Value) -> FieldTree {
        normalize::normalize(&self.schema, raw)
    }

    pub fn sanitize(&self, tree: &FieldTree, ctx: &ValidationContext) -> FieldTree {
        sanitize::sanitize(&self.schema, tree, &self.env(ctx))
    }

    pub fn visible_questions(&self, tree: &FieldTree, ctx: &ValidationContext) -> Vec<QuestionId> {
        visibility::visible_questions(&self.schema, tree, &self.env(ctx))
    }

    /// Normalize then sanitize stored JSON.
    fn load(&self, raw: &Value, ctx: &ValidationContext) -> FieldTree {
        self.sanitize(&self.normalize(raw), ctx)
    }

    /// Validate one answer.
    ///
    /// With `current` the cross-field checks run against it; without it they
    /// are skipped. Unknown ids are reported at `questionId`.
    pub fn validate_answer(
        &self,
        question_id: &str,
        raw: &Value,
        current: Option<&FieldTree>,
        ctx: &ValidationContext,
    ) -> AnswerResult {
        let question = self.schema.question(question_id);
        let slot = question.and_then(|q| self.schema.slot_at(q.path));
        let (Some(question), Some(slot)) = (question, slot) else {
            return Err(FieldErrors::single(QUESTION_ID_PATH, UNSUPPORTED_QUESTION));
        };

        let mut value = Answer::decode(slot, raw, question.path)?.into_value(slot);
        let cx = CheckCtx {
            env: self.env(ctx),
            tree: current,
        };
        let mut errors = FieldErrors::new();
        question.rule.check(question.path, &mut value, &cx, &mut errors);
        errors.into_result(value)
    }

    /// Every error blocking completion. The tree is sanitized first.
    pub fn validate_completion(&self, tree: &FieldTree, ctx: &ValidationContext) -> FieldErrors {
        let env = self.env(ctx);
        let clean = sanitize::sanitize(&self.schema, tree, &env);
        completion::validate_completion(&self.schema, &clean, &env)
    }

    /// Load stored JSON for display at `cursor`.
    pub fn read(&self, raw: &Value, cursor: i64, ctx: &ValidationContext) -> StepView {
        let tree = self.load(raw, ctx);
        let visible = self.visible_questions(&tree, ctx);
        let index = clamp_index(cursor, &visible);
        let current = visible.get(index).cloned();
        StepView {
            tree,
            visible,
            index,
            current,
        }
    }

    /// Validate and apply one answer. All or nothing.
    pub fn answer(
        &self,
        raw: &Value,
        question_id: &str,
        raw_answer: &Value,
        ctx: &ValidationContext,
    ) -> WriteOutcome {
        let mut tree = self.load(raw, ctx);
        let outcome = self.apply(&mut tree, question_id, raw_answer, ctx);
        match &outcome {
            WriteOutcome::Accepted { next_index, .. } => {
                debug!(step = %self.schema.name(), question = %question_id, next_index, "Accepted answer");
            }
            WriteOutcome::Rejected { field_errors } => {
                debug!(
                    step = %self.schema.name(),
                    question = %question_id,
                    errors = field_errors.len(),
                    "Rejected answer"
                );
            }
        }
        outcome
    }

    fn apply(
        &self,
        tree: &mut FieldTree,
        question_id: &str,
        raw_answer: &Value,
        ctx: &ValidationContext,
    ) -> WriteOutcome {
        let visible = self.visible_questions(tree, ctx);
        if self.schema.question(question_id).is_some() && !visible.iter().any(|id| id == &question_id) {
            return WriteOutcome::Rejected {
                field_errors: FieldErrors::single(QUESTION_ID_PATH, NOT_APPLICABLE),
            };
        }
        let value = match self.validate_answer(question_id, raw_answer, Some(&*tree), ctx) {
            Ok(value) => value,
            Err(field_errors) => return WriteOutcome::Rejected { field_errors },
        };
        let (Some(question), Some(answered_at)) = (
            self.schema.question(question_id),
            self.schema.position(question_id),
        ) else {
            return WriteOutcome::Rejected {
                field_errors: FieldErrors::single(QUESTION_ID_PATH, UNSUPPORTED_QUESTION),
            };
        };
        tree.set(question.path, value);
        let clean = self.sanitize(tree, ctx);
        let visible = self.visible_questions(&clean, ctx);

        // first visible question after the answered one in master order
        let following = visible
            .iter()
            .position(|id| self.schema.position(id.as_str()).is_some_and(|pos| pos > answered_at))
            .unwrap_or(visible.len());
        let next_index = clamp_index(i64::try_from(following).unwrap_or(i64::MAX), &visible);
        WriteOutcome::Accepted {
            tree: clean.to_json(),
            visible,
            next_index,
        }
    }

    /// Completion status of stored JSON.
    pub fn status(&self, raw: &Value, ctx: &ValidationContext) -> StepStatus {
        let errors = self.validate_completion(&self.normalize(raw), ctx);
        let status = if errors.is_empty() {
            StepStatus::Completed
        } else {
            StepStatus::InProgress
        };
        info!(step = %self.schema.name(), ?status, errors = errors.len(), "Evaluated step status");
        status
    }
}
