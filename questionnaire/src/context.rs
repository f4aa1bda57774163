//! Read-only inputs shared by conditions and rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Flags derived from sibling onboarding forms.
///
/// Computed by the caller; the engine only reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationContext {
    /// A joint owner must sign
    pub requires_joint_owner_signature: bool,
    /// Documentary photo ID is mandatory
    pub requires_documentary_id: bool,
    /// The holder is a non-resident alien
    pub is_non_resident_alien: bool,
}

impl ValidationContext {
    pub fn flag(&self, flag: ContextFlag) -> bool {
        match flag {
            ContextFlag::RequiresJointOwnerSignature => self.requires_joint_owner_signature,
            ContextFlag::RequiresDocumentaryId => self.requires_documentary_id,
            ContextFlag::IsNonResidentAlien => self.is_non_resident_alien,
        }
    }
}

/// Names one [`ValidationContext`] flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextFlag {
    RequiresJointOwnerSignature,
    RequiresDocumentaryId,
    IsNonResidentAlien,
}

/// Everything a condition or rule may consult besides the tree itself.
#[derive(Debug, Clone, Copy)]
pub struct RuleEnv<'a> {
    /// UTC date used for every date-bound check
    pub today: NaiveDate,
    pub context: &'a ValidationContext,
    pub config: &'a EngineConfig,
}

impl<'a> RuleEnv<'a> {
    pub fn new(today: NaiveDate, context: &'a ValidationContext, config: &'a EngineConfig) -> Self {
        Self {
            today,
            context,
            config,
        }
    }
}
