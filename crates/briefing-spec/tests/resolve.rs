use serde_json::{Value, json};

use briefing_spec::{
    AnswerSet, AnswerType, AnswerWarning, ComposedQuestionnaire, Condition, Configuration,
    DependencyRule, QualityTier, QuestionDefinition, RespondentType, resolve_active,
};

fn cfg() -> Configuration {
    Configuration::new(
        "ARCHITECTURE",
        "RESIDENTIAL",
        "HOUSE",
        QualityTier::Simple,
        RespondentType::Individual,
    )
}

fn questionnaire(questions: Vec<QuestionDefinition>) -> ComposedQuestionnaire {
    ComposedQuestionnaire::from_questions(cfg(), questions).expect("valid questionnaire")
}

fn answers(value: Value) -> AnswerSet {
    serde_json::from_value::<std::collections::BTreeMap<String, Value>>(value)
        .expect("answers fixture")
        .into_iter()
        .collect()
}

fn gated(id: &str, rule: DependencyRule) -> QuestionDefinition {
    QuestionDefinition::new(id, id, AnswerType::ShortText).with_rule(rule)
}

#[test]
fn equals_rule_activates_only_on_matching_answer() {
    let q = questionnaire(vec![
        QuestionDefinition::new("Q1", "Q1", AnswerType::ShortText),
        gated("Q2", DependencyRule::equals("Q1", "X")),
    ]);

    assert!(resolve_active(&q, &answers(json!({ "Q1": "X" }))).is_active("Q2"));
    assert!(!resolve_active(&q, &answers(json!({ "Q1": "Y" }))).is_active("Q2"));
    assert!(!resolve_active(&q, &answers(json!({}))).is_active("Q2"));
}

#[test]
fn greater_than_on_non_numeric_answer_is_false() {
    let q = questionnaire(vec![
        QuestionDefinition::new("rooms", "Rooms", AnswerType::Number),
        gated("rooms.detail", DependencyRule::greater_than("rooms", 0.0)),
    ]);

    let state = resolve_active(&q, &answers(json!({ "rooms": "abc" })));
    assert!(!state.is_active("rooms.detail"));
    assert_eq!(
        state.warnings(),
        &[AnswerWarning::Malformed {
            question_id: "rooms".into(),
            expected: AnswerType::Number,
        }]
    );

    assert!(resolve_active(&q, &answers(json!({ "rooms": 3 }))).is_active("rooms.detail"));
    assert!(resolve_active(&q, &answers(json!({ "rooms": "4" }))).is_active("rooms.detail"));
    assert!(!resolve_active(&q, &answers(json!({ "rooms": 0 }))).is_active("rooms.detail"));
}

#[test]
fn numeric_rules_compare_by_value() {
    let q = questionnaire(vec![
        QuestionDefinition::new("floors", "Floors", AnswerType::Number),
        gated("floors.elevator", DependencyRule::equals("floors", 3)),
        gated("floors.stairs", DependencyRule::includes("floors", [2, 3])),
    ]);

    for answer in [json!(3), json!(3.0), json!("3")] {
        let state = resolve_active(&q, &answers(json!({ "floors": answer.clone() })));
        assert!(state.answered_ids().contains(&"floors"), "{answer} is a valid number");
        assert!(state.is_active("floors.elevator"), "equals 3 for {answer}");
        assert!(state.is_active("floors.stairs"), "includes 3 for {answer}");
        assert!(state.warnings().is_empty());
    }

    let state = resolve_active(&q, &answers(json!({ "floors": 4 })));
    assert!(!state.is_active("floors.elevator"));
    assert!(!state.is_active("floors.stairs"));

    let not_equals = DependencyRule::new("floors", Condition::NotEquals { value: json!(3) });
    assert!(!not_equals.evaluate(Some(&json!(3.0))));
    assert!(not_equals.evaluate(Some(&json!(2.5))));
}

#[test]
fn text_answers_keep_exact_equality() {
    let rule = DependencyRule::equals("code", "3");
    assert!(rule.evaluate(Some(&json!("3"))));
    assert!(!rule.evaluate(Some(&json!("3.0"))));
    assert!(!rule.evaluate(Some(&json!(" 3"))));
}

#[test]
fn includes_matches_single_and_multi_select_answers() {
    let rule = DependencyRule::includes("spaces", ["pool", "sauna"]);

    assert!(rule.evaluate(Some(&json!("pool"))));
    assert!(!rule.evaluate(Some(&json!("garage"))));
    assert!(rule.evaluate(Some(&json!(["garage", "sauna"]))));
    assert!(!rule.evaluate(Some(&json!(["garage", "office"]))));
    assert!(!rule.evaluate(Some(&json!([]))));
    assert!(!rule.evaluate(None));
}

#[test]
fn remaining_operators_follow_their_contracts() {
    let not_empty = DependencyRule::not_empty("q");
    assert!(not_empty.evaluate(Some(&json!("value"))));
    assert!(!not_empty.evaluate(Some(&json!("   "))));
    assert!(!not_empty.evaluate(Some(&Value::Null)));
    assert!(!not_empty.evaluate(Some(&json!([]))));
    assert!(not_empty.evaluate(Some(&json!(false))));
    assert!(!not_empty.evaluate(None));

    let not_equals = DependencyRule::new("q", Condition::NotEquals { value: json!("no") });
    assert!(not_equals.evaluate(Some(&json!("yes"))));
    assert!(!not_equals.evaluate(Some(&json!("no"))));
    assert!(!not_equals.evaluate(None));

    let excludes = DependencyRule::new(
        "q",
        Condition::Excludes {
            values: vec![json!("none")],
        },
    );
    assert!(excludes.evaluate(Some(&json!(["pool"]))));
    assert!(!excludes.evaluate(Some(&json!(["none"]))));

    let less_than = DependencyRule::new("q", Condition::LessThan { value: 100.0 });
    assert!(less_than.evaluate(Some(&json!(99.5))));
    assert!(!less_than.evaluate(Some(&json!(true))));

    let equals_object = DependencyRule::equals("q", json!({ "city": "Recife" }));
    assert!(equals_object.evaluate(Some(&json!({ "city": "Recife" }))));
    assert!(!equals_object.evaluate(Some(&json!({ "city": "Olinda" }))));
}

#[test]
fn inactive_sources_deactivate_whole_chain() {
    let q = questionnaire(vec![
        QuestionDefinition::new("c", "C", AnswerType::Boolean),
        gated("b", DependencyRule::equals("c", true)),
        gated("a", DependencyRule::not_empty("b")),
    ]);

    // b's own rule would hold for a stored answer, but c switched the branch off.
    let state = resolve_active(&q, &answers(json!({ "c": false, "b": "kept", "a": "kept" })));
    assert_eq!(state.active_ids(), vec!["c"]);
    assert_eq!(state.inactive_ids(), vec!["b", "a"]);
    assert_eq!(state.stale_ids(), vec!["b", "a"]);
    assert!(state.answered_ids().iter().all(|id| *id == "c"));

    let state = resolve_active(&q, &answers(json!({ "c": true, "b": "kept", "a": "kept" })));
    assert_eq!(state.active_ids(), vec!["c", "b", "a"]);
    assert!(state.stale_ids().is_empty());
}

#[test]
fn evaluation_does_not_depend_on_declaration_order() {
    let q = questionnaire(vec![
        gated("a", DependencyRule::not_empty("b")),
        gated("b", DependencyRule::equals("c", "on")),
        QuestionDefinition::new("c", "C", AnswerType::ShortText),
    ]);

    let state = resolve_active(&q, &answers(json!({ "c": "on", "b": "x" })));
    assert_eq!(state.active_ids(), vec!["a", "b", "c"]);
}

#[test]
fn malformed_answers_count_as_absent() {
    let q = questionnaire(vec![
        QuestionDefinition::new("style", "Style", AnswerType::SingleSelect)
            .with_options(["modern", "classic"])
            .with_required(true),
        gated("style.notes", DependencyRule::equals("style", "baroque")),
        QuestionDefinition::new("start", "Start date", AnswerType::Date).with_required(true),
        QuestionDefinition::new("email", "E-mail", AnswerType::Email),
    ]);

    let state = resolve_active(
        &q,
        &answers(json!({
            "style": "baroque",
            "start": "2025-13-40",
            "email": "client@example.com",
            "ghost": 1
        })),
    );

    assert!(!state.is_active("style.notes"));
    assert_eq!(state.answered_ids(), vec!["email"]);
    assert_eq!(
        state.warnings(),
        &[
            AnswerWarning::Malformed {
                question_id: "style".into(),
                expected: AnswerType::SingleSelect,
            },
            AnswerWarning::Malformed {
                question_id: "start".into(),
                expected: AnswerType::Date,
            },
            AnswerWarning::UnknownQuestion {
                question_id: "ghost".into(),
            },
        ]
    );
}

#[test]
fn blank_answers_are_not_answered() {
    let q = questionnaire(vec![
        QuestionDefinition::new("name", "Name", AnswerType::ShortText).with_required(true),
    ]);
    let state = resolve_active(&q, &answers(json!({ "name": "  " })));
    assert!(state.answered_ids().is_empty());
    assert_eq!(state.unanswered_ids(), vec!["name"]);
    assert!(state.warnings().is_empty());
}

#[test]
fn display_order_groups_sections_and_next_question_prefers_required() {
    let q = questionnaire(vec![
        QuestionDefinition::new("site.area", "Area", AnswerType::Number)
            .with_section("Site")
            .with_required(true),
        QuestionDefinition::new("program.rooms", "Rooms", AnswerType::Number)
            .with_section("Program"),
        QuestionDefinition::new("site.slope", "Slope", AnswerType::Boolean).with_section("Site"),
        QuestionDefinition::new("program.suites", "Suites", AnswerType::Number)
            .with_section("Program")
            .with_required(true),
    ]);

    let state = resolve_active(&q, &answers(json!({ "site.area": 480 })));
    assert_eq!(
        state.display_order(),
        &["site.area", "site.slope", "program.rooms", "program.suites"]
    );
    let sections = state.sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].name.as_deref(), Some("Site"));
    assert_eq!(state.next_question(), Some("program.suites"));
    assert_eq!(state.required_ids(), vec!["site.area", "program.suites"]);
    assert_eq!(state.optional_ids(), vec!["program.rooms", "site.slope"]);

    let done = resolve_active(
        &q,
        &answers(json!({ "site.area": 480, "program.suites": 2 })),
    );
    assert_eq!(done.next_question(), Some("program.rooms"));
}
