use serde_json::json;

use briefing_spec::{Condition, DependencyRule, LegacyRuleError, normalize_legacy_rule};

#[test]
fn plain_reference_means_answered() {
    let rule = normalize_legacy_rule(&json!({ "id": "P13", "dependeDe": "P12" }))
        .expect("legacy rule");
    assert_eq!(rule, Some(DependencyRule::not_empty("P12")));
}

#[test]
fn values_that_show_become_membership() {
    let single = normalize_legacy_rule(&json!({
        "id": "P20",
        "dependeDe": { "perguntaId": "P19", "valoresQueExibem": ["Sim"] }
    }))
    .expect("legacy rule");
    assert_eq!(single, Some(DependencyRule::equals("P19", "Sim")));

    let several = normalize_legacy_rule(&json!({
        "id": "P21",
        "dependeDe": { "perguntaId": "P19", "valoresQueExibem": ["Piscina", "Sauna"] }
    }))
    .expect("legacy rule");
    assert_eq!(
        several,
        Some(DependencyRule::includes("P19", ["Piscina", "Sauna"]))
    );
}

#[test]
fn condition_operators_are_mapped() {
    let greater = normalize_legacy_rule(&json!({
        "condicao": { "perguntaId": "P40", "valores": ["2"], "operador": "maior" }
    }))
    .expect("legacy rule");
    assert_eq!(greater, Some(DependencyRule::greater_than("P40", 2.0)));

    let different = normalize_legacy_rule(&json!({
        "condicao": { "perguntaId": "P41", "valores": "Nenhum", "operador": "diferente" }
    }))
    .expect("legacy rule");
    assert_eq!(
        different,
        Some(DependencyRule::new(
            "P41",
            Condition::NotEquals {
                value: json!("Nenhum")
            }
        ))
    );

    let defaulted = normalize_legacy_rule(&json!({
        "condicao": { "perguntaId": "P42", "valores": ["A", "B"] }
    }))
    .expect("legacy rule");
    assert_eq!(defaulted, Some(DependencyRule::includes("P42", ["A", "B"])));
}

#[test]
fn questions_without_dependency_yield_none() {
    assert_eq!(
        normalize_legacy_rule(&json!({ "id": "P1", "texto": "Nome" })).expect("legacy rule"),
        None
    );
}

#[test]
fn malformed_legacy_rules_are_rejected() {
    assert_eq!(
        normalize_legacy_rule(&json!("P1")),
        Err(LegacyRuleError::NotAnObject)
    );
    assert_eq!(
        normalize_legacy_rule(&json!({ "dependeDe": "P1", "condicao": {} })),
        Err(LegacyRuleError::ConflictingShapes)
    );
    assert_eq!(
        normalize_legacy_rule(&json!({ "condicao": { "valores": ["x"] } })),
        Err(LegacyRuleError::MissingField("perguntaId"))
    );
    assert_eq!(
        normalize_legacy_rule(&json!({
            "condicao": { "perguntaId": "P2", "valores": ["x"], "operador": "parecido" }
        })),
        Err(LegacyRuleError::UnsupportedOperator("parecido".into()))
    );
    assert_eq!(
        normalize_legacy_rule(&json!({
            "condicao": { "perguntaId": "P2", "valores": ["muitos"], "operador": "maior" }
        })),
        Err(LegacyRuleError::InvalidThreshold {
            operator: "maior".into()
        })
    );
    assert_eq!(
        normalize_legacy_rule(&json!({
            "dependeDe": { "perguntaId": "P2", "valoresQueExibem": [] }
        })),
        Err(LegacyRuleError::NoValues)
    );
}
