//! Financial situation, investment profile and knowledge/experience.

use questionnaire::{
    BracketRangeRule, Condition, EntriesRule, ExperienceRule, IntegerRule, Rule, SchemaError,
    Slot, StepSchema,
};

/// Dollar brackets shared by every range question, lowest first.
pub const BRACKETS: &[&str] = &[
    "under_25k",
    "25k_50k",
    "50k_100k",
    "100k_250k",
    "250k_500k",
    "500k_1m",
    "1m_5m",
    "over_5m",
];
pub const TAX_BRACKETS: &[&str] = &["0_15", "15_25", "25_35", "over_35"];
pub const OBJECTIVES: &[&str] = &["preservation", "income", "growth", "speculation"];
pub const RISK_TOLERANCES: &[&str] = &["conservative", "moderate", "aggressive"];
pub const TIME_HORIZONS: &[&str] = &["short", "medium", "long"];

/// Investment types with a knowledge/experience record.
pub const INVESTMENT_TYPES: &[&str] = &[
    "stocks",
    "bonds",
    "mutualFunds",
    "options",
    "futures",
    "annuities",
    "alternatives",
    "other",
];
/// The type that also carries a free-text label.
pub const OTHER_TYPE: &str = "other";

/// Level path and the paths it clears when set to `none`.
const KNOWLEDGE_CLEARS: &[(&str, &[&str])] = &[
    ("knowledge.stocks.level", &["knowledge.stocks.sinceYear"]),
    ("knowledge.bonds.level", &["knowledge.bonds.sinceYear"]),
    ("knowledge.mutualFunds.level", &["knowledge.mutualFunds.sinceYear"]),
    ("knowledge.options.level", &["knowledge.options.sinceYear"]),
    ("knowledge.futures.level", &["knowledge.futures.sinceYear"]),
    ("knowledge.annuities.level", &["knowledge.annuities.sinceYear"]),
    ("knowledge.alternatives.level", &["knowledge.alternatives.sinceYear"]),
    ("knowledge.other.level", &["knowledge.other.sinceYear", "knowledge.other.label"]),
];

fn slots() -> Vec<Slot> {
    vec![
        Slot::group(
            "financial",
            vec![
                BracketRangeRule::slot("annualIncome"),
                BracketRangeRule::slot("netWorth"),
                BracketRangeRule::slot("liquidNetWorth"),
                Slot::choice("taxBracket", TAX_BRACKETS),
                Slot::entries("otherAssets"),
            ],
        ),
        Slot::group(
            "profile",
            vec![
                Slot::choice("objective", OBJECTIVES),
                Slot::choice("riskTolerance", RISK_TOLERANCES),
                Slot::choice("timeHorizon", TIME_HORIZONS),
                Slot::integer("yearsInvesting"),
            ],
        ),
        ExperienceRule::slot("knowledge", INVESTMENT_TYPES, Some(OTHER_TYPE)),
    ]
}

pub fn schema() -> Result<StepSchema, SchemaError> {
    let mut builder = StepSchema::builder("financial-profile", "step5");
    for slot in slots() {
        builder = builder.slot(slot);
    }
    builder = builder
        .question(
            "financial.annualIncome",
            Rule::Range(BracketRangeRule::new("Annual income", BRACKETS)),
        )
        .question(
            "financial.netWorth",
            Rule::Range(BracketRangeRule::new("Net worth", BRACKETS)),
        )
        .question(
            "financial.liquidNetWorth",
            Rule::Range(
                BracketRangeRule::new("Liquid net worth", BRACKETS)
                    .not_above("financial.netWorth", "net worth"),
            ),
        )
        .question("financial.taxBracket", Rule::choice("tax bracket"))
        .question(
            "financial.otherAssets",
            Rule::Entries(EntriesRule {
                label: "Other assets",
                required: false,
            }),
        )
        .question("profile.objective", Rule::choice("investment objective"))
        .question("profile.riskTolerance", Rule::choice("risk tolerance"))
        .question("profile.timeHorizon", Rule::choice("time horizon"))
        .question(
            "profile.yearsInvesting",
            Rule::Integer(IntegerRule {
                label: "Years of experience",
                required: true,
                max: None,
            }),
        )
        .question(
            "knowledge",
            Rule::Experience(ExperienceRule::new(INVESTMENT_TYPES, Some(OTHER_TYPE))),
        );
    for &(level, paths) in KNOWLEDGE_CLEARS {
        builder = builder.clear_when(Condition::selected(level, "none"), paths);
    }
    builder.build()
}
