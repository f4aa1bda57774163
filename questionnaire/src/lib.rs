//! Conditional questionnaire engine for regulated onboarding steps.
//!
//! One generic interpreter drives every onboarding step. A step is pure
//! schema data ([`StepSchema`]): the slot tree, the ordered question
//! catalog with visibility predicates and validation rules, extra clearing
//! rules, collection exclusions and completion-only rules.
//!
//! # Pipeline
//!
//! ```text
//!  stored JSON ──► normalize ──► sanitize ──► visible_questions ──► render
//!
//!  (questionId, rawAnswer)
//!        │
//!        ▼
//!  Answer::decode ──► Rule::check ──► apply ──► sanitize ──► persist
//!                                                  │
//!                                                  ▼
//!                                        visible_questions + clamp_index
//!
//!  review/submit: sanitize ──► validate_completion ──► COMPLETED | IN_PROGRESS
//! ```
//!
//! Every entry point is synchronous and total: semantic problems come back
//! as a [`FieldErrors`] map keyed by dotted field path, structural problems
//! in stored data are absorbed by the normalizer.
//!
//! # Example
//!
//! ```ignore
//! use questionnaire::{FixedClock, QuestionnaireEngine, ValidationContext};
//!
//! let engine = QuestionnaireEngine::new(schema).with_clock(FixedClock::ymd(2025, 6, 15));
//! let outcome = engine.answer(&stored, "step3.holder.kind", &json!({"person": true}), &ValidationContext::default());
//! ```

pub mod answer;
pub mod clock;
pub mod completion;
pub mod condition;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod normalize;
pub mod rules;
pub mod sanitize;
pub mod schema;
pub mod tree;
pub mod visibility;

// Re-export main types
pub use answer::{Answer, EntryAnswer};
pub use clock::{Clock, FixedClock, SystemClock};
pub use completion::{
    validate_completion, CompletionRule, DOCUMENTARY_ID_MESSAGE, ENTITY_COUNTRY_MESSAGE,
};
pub use condition::Condition;
pub use config::EngineConfig;
pub use context::{ContextFlag, RuleEnv, ValidationContext};
pub use engine::{
    AnswerResult, QuestionnaireEngine, StepStatus, StepView, WriteOutcome, NOT_APPLICABLE,
};
pub use errors::{FieldErrors, SchemaError, QUESTION_ID_PATH, UNSUPPORTED_QUESTION};
pub use normalize::normalize;
pub use rules::{
    AtLeastOne, BracketRangeRule, CheckCtx, ChoiceRule, CodesRule, DateRule, DisclosureRule,
    EntriesRule, ExperienceRule, GroupRule, IntegerRule, PhotoIdRule, Rule, Temporal, TextFormat,
    TextRule, YearRule, KNOWLEDGE_LEVELS, RANGE_ORDER_MESSAGE,
};
pub use sanitize::sanitize;
pub use schema::{ClearRule, Exclusion, Question, QuestionId, Slot, SlotKind, StepSchema};
pub use tree::{ChoiceSet, Entry, FieldTree, FieldValue};
pub use visibility::{clamp_index, visible_questions};
