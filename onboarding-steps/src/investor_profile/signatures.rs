//! Account owner, joint owner and financial professional signatures.

use questionnaire::{Condition, ContextFlag, SchemaError, Slot, StepSchema};

use crate::blocks::{signature_rule, signature_slot};

pub fn schema() -> Result<StepSchema, SchemaError> {
    StepSchema::builder("signatures", "step7")
        .slot(Slot::group(
            "signatures",
            vec![
                signature_slot("accountOwner"),
                signature_slot("jointOwner"),
                signature_slot("financialProfessional"),
            ],
        ))
        .question("signatures.accountOwner", signature_rule())
        .question_when(
            "signatures.jointOwner",
            signature_rule(),
            Condition::context(ContextFlag::RequiresJointOwnerSignature),
        )
        .question("signatures.financialProfessional", signature_rule())
        .build()
}
