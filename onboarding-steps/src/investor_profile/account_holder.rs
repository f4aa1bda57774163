//! Account holder identity: kind, tax IDs, contact details, citizenship,
//! employment and documentary photo IDs.
//!
//! The primary holder (step 3) and the secondary holder (step 4) answer the
//! same questions; only the question id prefix differs.

use questionnaire::{
    CodesRule, CompletionRule, Condition, ContextFlag, IntegerRule, PhotoIdRule, Rule,
    SchemaError, Slot, StepSchema, Temporal, TextFormat,
};

use crate::blocks::{
    address_rule, address_slot, name_rule, name_slot, phones_rule, phones_slot, PHOTO_ID_TYPES,
    YES_NO,
};

pub const HOLDER_KINDS: &[&str] = &["person", "entity"];
pub const GENDERS: &[&str] = &["female", "male", "nonBinary", "preferNotToSay"];
pub const MARITAL_STATUSES: &[&str] = &["single", "married", "divorced", "widowed", "domesticPartner"];
pub const EMPLOYMENT_STATUSES: &[&str] = &[
    "employed",
    "selfEmployed",
    "retired",
    "unemployed",
    "student",
    "homemaker",
];
/// Statuses that carry employer details.
pub const WORKING: &[&str] = &["employed", "selfEmployed"];

fn person() -> Condition {
    Condition::selected("holder.kind", "person")
}

fn entity() -> Condition {
    Condition::selected("holder.kind", "entity")
}

fn working() -> Condition {
    person().and(Condition::selected_any("holder.employment.status", WORKING))
}

fn holder_slot() -> Slot {
    Slot::group(
        "holder",
        vec![
            Slot::choice("kind", HOLDER_KINDS),
            name_slot("name"),
            Slot::text("entityName"),
            Slot::group(
                "taxId",
                vec![
                    Slot::text("ssn"),
                    Slot::choice("hasEin", YES_NO),
                    Slot::text("ein"),
                ],
            ),
            Slot::date("dateOfBirth"),
            Slot::choice("specifiedAdult", YES_NO),
            Slot::choice("gender", GENDERS),
            Slot::choice("maritalStatus", MARITAL_STATUSES),
            Slot::text("email"),
            phones_slot("phones"),
            address_slot("legalAddress"),
            Slot::choice("mailingDiffers", YES_NO),
            address_slot("mailingAddress"),
            Slot::group(
                "citizenship",
                vec![Slot::codes("primary"), Slot::codes("additional")],
            ),
            Slot::group(
                "employment",
                vec![
                    Slot::choice("status", EMPLOYMENT_STATUSES),
                    Slot::text("occupation"),
                    Slot::integer("yearsEmployed"),
                    Slot::text("businessType"),
                    Slot::text("employerName"),
                    address_slot("employerAddress"),
                ],
            ),
            Slot::group(
                "photoIds",
                vec![
                    PhotoIdRule::slot("primary", PHOTO_ID_TYPES),
                    PhotoIdRule::slot("secondary", PHOTO_ID_TYPES),
                ],
            ),
        ],
    )
}

/// Holder schema under the given step name and question id prefix.
pub fn holder_schema(name: &'static str, prefix: &'static str) -> Result<StepSchema, SchemaError> {
    StepSchema::builder(name, prefix)
        .slot(holder_slot())
        .question("holder.kind", Rule::choice("account holder type"))
        .question_when("holder.name", name_rule(), person())
        .question_when("holder.entityName", Rule::text("Entity name"), entity())
        .question_when(
            "holder.taxId.ssn",
            Rule::formatted("SSN", TextFormat::Ssn),
            person(),
        )
        .question("holder.taxId.hasEin", Rule::choice("answer for EIN"))
        .question_when(
            "holder.taxId.ein",
            Rule::formatted("EIN", TextFormat::Ein),
            Condition::selected("holder.taxId.hasEin", "yes"),
        )
        .question_when(
            "holder.dateOfBirth",
            Rule::date("Date of birth", Temporal::Past),
            person(),
        )
        .question_when(
            "holder.specifiedAdult",
            Rule::choice("specified adult answer"),
            person().and(Condition::minor("holder.dateOfBirth")),
        )
        .question_when("holder.gender", Rule::choice("gender"), person())
        .question_when("holder.maritalStatus", Rule::choice("marital status"), person())
        .question("holder.email", Rule::formatted("Email", TextFormat::Email))
        .question("holder.phones", phones_rule())
        .question("holder.legalAddress", address_rule(true))
        .question("holder.mailingDiffers", Rule::choice("mailing address answer"))
        .question_when(
            "holder.mailingAddress",
            address_rule(false),
            Condition::selected("holder.mailingDiffers", "yes"),
        )
        .question(
            "holder.citizenship.primary",
            Rule::Codes(CodesRule::required("Primary citizenship")),
        )
        .question(
            "holder.citizenship.additional",
            Rule::Codes(
                CodesRule::optional("Additional citizenship")
                    .exclusive_of("holder.citizenship.primary", "primary citizenship"),
            ),
        )
        .question_when(
            "holder.employment.status",
            Rule::choice("employment status"),
            person(),
        )
        .question_when("holder.employment.occupation", Rule::text("Occupation"), working())
        .question_when(
            "holder.employment.yearsEmployed",
            Rule::Integer(IntegerRule {
                label: "Years employed",
                required: true,
                max: Some(80),
            }),
            working(),
        )
        .question_when(
            "holder.employment.businessType",
            Rule::text("Type of business"),
            working(),
        )
        .question_when(
            "holder.employment.employerName",
            Rule::text("Employer name"),
            working(),
        )
        .question_when("holder.employment.employerAddress", address_rule(false), working())
        .question(
            "holder.photoIds.primary",
            Rule::PhotoId(PhotoIdRule::new("Primary photo ID")),
        )
        .question(
            "holder.photoIds.secondary",
            Rule::PhotoId(PhotoIdRule::new("Secondary photo ID")),
        )
        .clear_when(entity(), &["holder.employment"])
        .exclusion("holder.citizenship.primary", "holder.citizenship.additional")
        .completion(CompletionRule::DocumentaryId {
            blocks: vec!["holder.photoIds.primary", "holder.photoIds.secondary"],
            when: person().and(
                Condition::context(ContextFlag::RequiresDocumentaryId)
                    .or(Condition::context(ContextFlag::IsNonResidentAlien)),
            ),
        })
        .completion(CompletionRule::EntityCountries {
            primary: "holder.citizenship.primary",
            additional: "holder.citizenship.additional",
            entity_when: entity(),
        })
        .build()
}

/// Primary account holder (step 3).
pub fn schema() -> Result<StepSchema, SchemaError> {
    holder_schema("account-holder", "step3")
}
