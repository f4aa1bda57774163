//! Investor onboarding steps for the questionnaire engine.
//!
//! Each step is pure schema data handed to the generic
//! [`questionnaire::QuestionnaireEngine`]:
//!
//! - **Account holder** (step 3): identity, tax IDs, contact, citizenship,
//!   employment, documentary photo IDs
//! - **Secondary holder** (step 4): the same questions for a joint holder
//! - **Financial profile** (step 5): income and net worth ranges, investment
//!   profile, knowledge and experience
//! - **Disclosures** (step 6): regulatory affiliations
//! - **Signatures** (step 7)
//!
//! # Example
//!
//! ```ignore
//! use onboarding_steps::StepKind;
//! use questionnaire::ValidationContext;
//!
//! let engine = StepKind::AccountHolder.engine()?;
//! let view = engine.read(&stored, cursor, &ValidationContext::default());
//! ```

pub mod blocks;
pub mod investor_profile;

use std::fmt;
use std::str::FromStr;

use questionnaire::{QuestionnaireEngine, SchemaError, StepSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use investor_profile::{
    account_holder, disclosures, financial_profile, secondary_holder, signatures,
};

/// The onboarding steps driven by the questionnaire engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    AccountHolder,
    SecondaryHolder,
    FinancialProfile,
    Disclosures,
    Signatures,
}

/// Errors from the step registry.
#[derive(Debug, Error, PartialEq)]
pub enum StepError {
    /// No step has this name or question prefix
    #[error("Unknown step: {0}")]
    UnknownStep(String),

    /// The step's schema failed its construction checks
    #[error("Invalid step schema: {0}")]
    Schema(#[from] SchemaError),
}

impl StepKind {
    pub const ALL: [StepKind; 5] = [
        StepKind::AccountHolder,
        StepKind::SecondaryHolder,
        StepKind::FinancialProfile,
        StepKind::Disclosures,
        StepKind::Signatures,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::AccountHolder => "account-holder",
            StepKind::SecondaryHolder => "secondary-holder",
            StepKind::FinancialProfile => "financial-profile",
            StepKind::Disclosures => "disclosures",
            StepKind::Signatures => "signatures",
        }
    }

    /// Question id prefix (`step3` for `step3.holder.kind`).
    pub fn prefix(&self) -> &'static str {
        match self {
            StepKind::AccountHolder => "step3",
            StepKind::SecondaryHolder => "step4",
            StepKind::FinancialProfile => "step5",
            StepKind::Disclosures => "step6",
            StepKind::Signatures => "step7",
        }
    }

    /// Step owning a question id, judged by its prefix.
    pub fn for_question(question_id: &str) -> Result<StepKind, StepError> {
        let prefix = question_id.split('.').next().unwrap_or_default();
        StepKind::ALL
            .into_iter()
            .find(|kind| kind.prefix() == prefix)
            .ok_or_else(|| StepError::UnknownStep(question_id.to_string()))
    }

    pub fn schema(&self) -> Result<StepSchema, StepError> {
        let schema = match self {
            StepKind::AccountHolder => account_holder::schema(),
            StepKind::SecondaryHolder => secondary_holder::schema(),
            StepKind::FinancialProfile => financial_profile::schema(),
            StepKind::Disclosures => disclosures::schema(),
            StepKind::Signatures => signatures::schema(),
        }?;
        Ok(schema)
    }

    /// Engine for this step on the system clock with default config.
    pub fn engine(&self) -> Result<QuestionnaireEngine, StepError> {
        let schema = self.schema()?;
        debug!(step = %self, questions = schema.questions().len(), "Created step engine");
        Ok(QuestionnaireEngine::new(schema))
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.prefix() == s)
            .ok_or_else(|| StepError::UnknownStep(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_schema_builds() {
        for kind in StepKind::ALL {
            let schema = kind.schema().unwrap();
            assert_eq!(schema.prefix(), kind.prefix());
            assert_eq!(schema.name(), kind.as_str());
            assert!(schema
                .questions()
                .iter()
                .all(|q| q.id.as_str().starts_with(&format!("{}.", kind.prefix()))));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("financial-profile".parse::<StepKind>(), Ok(StepKind::FinancialProfile));
        assert_eq!("step7".parse::<StepKind>(), Ok(StepKind::Signatures));
        assert_eq!(
            "step9".parse::<StepKind>(),
            Err(StepError::UnknownStep("step9".to_string()))
        );
    }

    #[test]
    fn test_for_question() {
        assert_eq!(
            StepKind::for_question("step4.holder.kind"),
            Ok(StepKind::SecondaryHolder)
        );
        assert!(StepKind::for_question("holder.kind").is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&StepKind::AccountHolder).unwrap();
        assert_eq!(json, "\"accountHolder\"");
    }
}
