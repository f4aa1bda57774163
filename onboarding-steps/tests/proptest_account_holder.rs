use onboarding_steps::account_holder::{EMPLOYMENT_STATUSES, HOLDER_KINDS};
use onboarding_steps::blocks::YES_NO;
use onboarding_steps::StepKind;
use proptest::prelude::*;
use proptest::test_runner::Config;
use questionnaire::{FixedClock, QuestionnaireEngine, ValidationContext};
use serde_json::{json, Map, Value};

fn engine() -> QuestionnaireEngine {
    StepKind::AccountHolder
        .engine()
        .unwrap()
        .with_clock(FixedClock::ymd(2025, 6, 15))
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        "[A-Za-z0-9 .-]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map(
                prop::sample::select(vec![
                    "holder", "kind", "taxId", "ssn", "person", "entity", "citizenship",
                    "primary", "photoIds", "label", "x",
                ]),
                inner,
                0..5,
            )
            .prop_map(|m| Value::Object(m.into_iter().map(|(k, v)| (k.to_string(), v)).collect())),
        ]
    })
}

fn flags(options: &'static [&'static str]) -> impl Strategy<Value = Value> {
    prop::collection::vec(any::<bool>(), options.len()).prop_map(move |bits| {
        Value::Object(
            options
                .iter()
                .zip(bits)
                .map(|(key, bit)| (key.to_string(), Value::Bool(bit)))
                .collect::<Map<_, _>>(),
        )
    })
}

fn codes() -> impl Strategy<Value = Value> {
    prop::sample::subsequence(vec!["US", "CA", "FR", "us", "XXX"], 0..=5).prop_map(|c| json!(c))
}

/// Holder trees that exercise every visibility condition.
fn stored_holder() -> impl Strategy<Value = Value> {
    (
        (flags(HOLDER_KINDS), flags(YES_NO), prop::option::of("[0-9]{2}-[0-9]{7}")),
        prop::sample::select(vec!["2012-03-04", "1980-07-09", "2007-06-16", "not a date", ""]),
        (flags(YES_NO), flags(EMPLOYMENT_STATUSES), prop::option::of("[A-Za-z ]{0,12}")),
        (codes(), codes()),
        (flags(YES_NO), prop::option::of("[0-9]{1,4} [A-Za-z]{3,8} St")),
    )
        .prop_map(
            |((kind, has_ein, ein), dob, (specified, status, occupation), (primary, additional), (differs, line1))| {
                json!({"holder": {
                    "kind": kind,
                    "taxId": {"ssn": "123-45-6789", "hasEin": has_ein, "ein": ein},
                    "dateOfBirth": dob,
                    "specifiedAdult": specified,
                    "employment": {"status": status, "occupation": occupation, "yearsEmployed": 3},
                    "citizenship": {"primary": primary, "additional": additional},
                    "mailingDiffers": differs,
                    "mailingAddress": {"line1": line1, "country": "ca"}
                }})
            },
        )
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn normalize_is_total_and_complete(raw in arb_json()) {
        let engine = engine();
        let tree = engine.normalize(&raw);
        for question in engine.schema().questions() {
            prop_assert!(tree.get(question.path).is_some(), "missing {}", question.path);
        }
    }

    #[test]
    fn sanitize_is_idempotent(raw in stored_holder()) {
        let engine = engine();
        let ctx = ValidationContext::default();
        let once = engine.sanitize(&engine.normalize(&raw), &ctx);
        let twice = engine.sanitize(&once, &ctx);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn sanitized_tree_round_trips(raw in stored_holder()) {
        let engine = engine();
        let ctx = ValidationContext::default();
        let clean = engine.sanitize(&engine.normalize(&raw), &ctx);
        let reloaded = engine.normalize(&serde_json::to_value(&clean).unwrap());
        prop_assert_eq!(reloaded, clean);
    }

    #[test]
    fn hidden_questions_hold_defaults(raw in stored_holder()) {
        let engine = engine();
        let ctx = ValidationContext::default();
        let clean = engine.sanitize(&engine.normalize(&raw), &ctx);
        let visible = engine.visible_questions(&clean, &ctx);
        for question in engine.schema().questions() {
            if !visible.contains(&question.id) {
                prop_assert!(
                    clean.get(question.path).is_some_and(|v| v.is_empty()),
                    "{} is hidden but holds data",
                    question.id
                );
            }
        }
    }

    #[test]
    fn additional_never_repeats_primary(raw in stored_holder()) {
        let engine = engine();
        let clean = engine.sanitize(&engine.normalize(&raw), &ValidationContext::default());
        let primary = clean.codes("holder.citizenship.primary");
        prop_assert!(clean
            .codes("holder.citizenship.additional")
            .iter()
            .all(|code| !primary.contains(code)));
    }

    #[test]
    fn choice_sets_hold_at_most_one(kind in flags(HOLDER_KINDS), status in flags(EMPLOYMENT_STATUSES)) {
        let engine = engine();
        let tree = engine.normalize(&json!({"holder": {"kind": kind, "employment": {"status": status}}}));
        for (path, options) in [("holder.kind", HOLDER_KINDS), ("holder.employment.status", EMPLOYMENT_STATUSES)] {
            let set = tree.choice(path).unwrap();
            prop_assert_eq!(set.options().collect::<Vec<_>>(), options.to_vec());
            let json = set.to_json();
            let trues = json.as_object().unwrap().values().filter(|v| **v == Value::Bool(true)).count();
            prop_assert!(trues <= 1);
        }
    }
}
