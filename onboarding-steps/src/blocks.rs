//! Composite blocks shared by several steps.

use questionnaire::{GroupRule, Rule, Slot, Temporal, TextFormat};

/// Options of every yes/no toggle.
pub const YES_NO: &[&str] = &["yes", "no"];

/// Accepted documentary photo ID types.
pub const PHOTO_ID_TYPES: &[&str] = &["driversLicense", "passport", "stateId", "militaryId"];

pub fn address_slot(name: &'static str) -> Slot {
    Slot::group(
        name,
        vec![
            Slot::text("line1"),
            Slot::text("line2"),
            Slot::text("city"),
            Slot::text("stateProvince"),
            Slot::text("postalCode"),
            Slot::country("country"),
        ],
    )
}

/// Address block rule. A legal address may not be a post office box.
pub fn address_rule(legal: bool) -> Rule {
    let line1 = if legal {
        Rule::formatted("Street address", TextFormat::StreetAddress)
    } else {
        Rule::text("Street address")
    };
    Rule::Group(GroupRule::new(vec![
        ("line1", line1),
        ("line2", Rule::optional_text("Address line 2")),
        ("city", Rule::text("City")),
        ("stateProvince", Rule::text("State/Province")),
        ("postalCode", Rule::text("Postal code")),
        ("country", Rule::formatted("Country", TextFormat::Country)),
    ]))
}

pub fn phones_slot(name: &'static str) -> Slot {
    Slot::group(
        name,
        vec![Slot::text("home"), Slot::text("business"), Slot::text("mobile")],
    )
}

/// Each number is optional on its own, but one must be given.
pub fn phones_rule() -> Rule {
    Rule::Group(
        GroupRule::new(vec![
            ("home", Rule::optional_formatted("Home phone", TextFormat::Phone)),
            ("business", Rule::optional_formatted("Business phone", TextFormat::Phone)),
            ("mobile", Rule::optional_formatted("Mobile phone", TextFormat::Phone)),
        ])
        .at_least_one(
            &["home", "business", "mobile"],
            "Provide at least one phone number",
        ),
    )
}

pub fn name_slot(name: &'static str) -> Slot {
    Slot::group(
        name,
        vec![Slot::text("first"), Slot::text("middle"), Slot::text("last")],
    )
}

pub fn name_rule() -> Rule {
    Rule::Group(GroupRule::new(vec![
        ("first", Rule::text("First name")),
        ("middle", Rule::optional_text("Middle name")),
        ("last", Rule::text("Last name")),
    ]))
}

pub fn signature_slot(name: &'static str) -> Slot {
    Slot::group(
        name,
        vec![
            Slot::text("typedSignature"),
            Slot::text("printedName"),
            Slot::date("date"),
        ],
    )
}

pub fn signature_rule() -> Rule {
    Rule::Group(GroupRule::new(vec![
        ("typedSignature", Rule::text("Signature")),
        ("printedName", Rule::text("Printed name")),
        ("date", Rule::date("Signature date", Temporal::NotFuture)),
    ]))
}
