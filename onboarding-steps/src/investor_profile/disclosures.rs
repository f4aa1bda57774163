//! Regulatory yes/no disclosures with conditional detail fields.

use questionnaire::{Condition, DisclosureRule, IntegerRule, Rule, SchemaError, Slot, StepSchema};

use crate::blocks::YES_NO;

fn said_no(toggle: &'static str) -> Condition {
    Condition::selected(toggle, "yes").negate()
}

fn block(name: &'static str, details: Vec<Slot>) -> Slot {
    let mut members = vec![Slot::choice("answer", YES_NO)];
    members.extend(details);
    Slot::group(name, members)
}

fn slots() -> Slot {
    Slot::group(
        "disclosures",
        vec![
            block("brokerDealerAffiliation", vec![Slot::text("firmName")]),
            block(
                "relatedEmployee",
                vec![
                    Slot::text("employeeName"),
                    Slot::text("relationship"),
                    Slot::text("firmName"),
                ],
            ),
            block(
                "otherBrokerageAccounts",
                vec![Slot::text("firmName"), Slot::integer("accountCount")],
            ),
            block("exchangeAffiliation", vec![Slot::text("organization")]),
            block(
                "seniorOfficer",
                vec![Slot::text("companyName"), Slot::text("tickerSymbol")],
            ),
        ],
    )
}

pub fn schema() -> Result<StepSchema, SchemaError> {
    StepSchema::builder("disclosures", "step6")
        .slot(slots())
        .question(
            "disclosures.brokerDealerAffiliation",
            Rule::Disclosure(DisclosureRule::new(
                "broker-dealer affiliation",
                vec![("firmName", Rule::text("Firm name"))],
            )),
        )
        .question(
            "disclosures.relatedEmployee",
            Rule::Disclosure(DisclosureRule::new(
                "related employee",
                vec![
                    ("employeeName", Rule::text("Employee name")),
                    ("relationship", Rule::text("Relationship")),
                    ("firmName", Rule::text("Firm name")),
                ],
            )),
        )
        .question(
            "disclosures.otherBrokerageAccounts",
            Rule::Disclosure(DisclosureRule::new(
                "other brokerage accounts",
                vec![
                    ("firmName", Rule::text("Firm name")),
                    (
                        "accountCount",
                        Rule::Integer(IntegerRule {
                            label: "Number of accounts",
                            required: true,
                            max: None,
                        }),
                    ),
                ],
            )),
        )
        .question(
            "disclosures.exchangeAffiliation",
            Rule::Disclosure(DisclosureRule::new(
                "exchange or FINRA affiliation",
                vec![("organization", Rule::text("Organization"))],
            )),
        )
        .question(
            "disclosures.seniorOfficer",
            Rule::Disclosure(DisclosureRule::new(
                "senior officer or 10% shareholder",
                vec![
                    ("companyName", Rule::text("Company name")),
                    ("tickerSymbol", Rule::optional_text("Ticker symbol")),
                ],
            )),
        )
        .clear_when(
            said_no("disclosures.brokerDealerAffiliation.answer"),
            &["disclosures.brokerDealerAffiliation.firmName"],
        )
        .clear_when(
            said_no("disclosures.relatedEmployee.answer"),
            &[
                "disclosures.relatedEmployee.employeeName",
                "disclosures.relatedEmployee.relationship",
                "disclosures.relatedEmployee.firmName",
            ],
        )
        .clear_when(
            said_no("disclosures.otherBrokerageAccounts.answer"),
            &[
                "disclosures.otherBrokerageAccounts.firmName",
                "disclosures.otherBrokerageAccounts.accountCount",
            ],
        )
        .clear_when(
            said_no("disclosures.exchangeAffiliation.answer"),
            &["disclosures.exchangeAffiliation.organization"],
        )
        .clear_when(
            said_no("disclosures.seniorOfficer.answer"),
            &[
                "disclosures.seniorOfficer.companyName",
                "disclosures.seniorOfficer.tickerSymbol",
            ],
        )
        .build()
}
