//! Import of dependency declarations written in the older catalog shapes.
//!
//! Three shapes occur in legacy question objects:
//!
//! * `"dependeDe": "P12"`: shown once `P12` has any answer;
//! * `"dependeDe": { "perguntaId": "P12", "valoresQueExibem": ["Sim"] }`;
//! * `"condicao": { "perguntaId": "P12", "valores": [..], "operador": "igual" }`.
//!
//! All of them normalize into a single [`DependencyRule`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::rule::{Condition, DependencyRule, as_number};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegacyRuleError {
    #[error("legacy question must be a JSON object")]
    NotAnObject,
    #[error("question declares both 'dependeDe' and 'condicao'")]
    ConflictingShapes,
    #[error("legacy dependency is missing '{0}'")]
    MissingField(&'static str),
    #[error("legacy dependency field '{0}' has an unexpected type")]
    InvalidField(&'static str),
    #[error("unsupported legacy operator '{0}'")]
    UnsupportedOperator(String),
    #[error("operator '{operator}' needs exactly one numeric value")]
    InvalidThreshold { operator: String },
    #[error("legacy dependency lists no values")]
    NoValues,
}

/// Reads the dependency of a legacy question object, if it has one.
pub fn normalize_legacy_rule(question: &Value) -> Result<Option<DependencyRule>, LegacyRuleError> {
    let object = question.as_object().ok_or(LegacyRuleError::NotAnObject)?;
    match (object.get("dependeDe"), object.get("condicao")) {
        (None, None) => Ok(None),
        (Some(_), Some(_)) => Err(LegacyRuleError::ConflictingShapes),
        (Some(Value::String(source)), None) => Ok(Some(DependencyRule::not_empty(source.trim()))),
        (Some(Value::Object(dependency)), None) => {
            let source = source_id(dependency)?;
            let values = value_list(dependency, "valoresQueExibem")?;
            Ok(Some(DependencyRule::new(source, membership(values))))
        }
        (Some(_), None) => Err(LegacyRuleError::InvalidField("dependeDe")),
        (None, Some(Value::Object(condition))) => convert_condition(condition).map(Some),
        (None, Some(_)) => Err(LegacyRuleError::InvalidField("condicao")),
    }
}

fn convert_condition(condition: &Map<String, Value>) -> Result<DependencyRule, LegacyRuleError> {
    let source = source_id(condition)?;
    let operator = match condition.get("operador") {
        None => "igual".to_string(),
        Some(Value::String(operator)) => operator.trim().to_lowercase(),
        Some(_) => return Err(LegacyRuleError::InvalidField("operador")),
    };

    let condition = match operator.as_str() {
        "preenchido" | "not_empty" => Condition::NotEmpty,
        "igual" | "equals" | "contem" | "includes" | "in" => {
            membership(value_list(condition, "valores")?)
        }
        "diferente" | "not_equals" | "nao_contem" | "excludes" => {
            let mut values = value_list(condition, "valores")?;
            if values.len() == 1 {
                Condition::NotEquals {
                    value: values.remove(0),
                }
            } else {
                Condition::Excludes { values }
            }
        }
        "maior" | "greater_than" => Condition::GreaterThan {
            value: threshold(condition, &operator)?,
        },
        "menor" | "less_than" => Condition::LessThan {
            value: threshold(condition, &operator)?,
        },
        _ => return Err(LegacyRuleError::UnsupportedOperator(operator)),
    };

    Ok(DependencyRule::new(source, condition))
}

/// One value is an equality test, several are a membership test.
fn membership(mut values: Vec<Value>) -> Condition {
    if values.len() == 1 {
        Condition::Equals {
            value: values.remove(0),
        }
    } else {
        Condition::Includes { values }
    }
}

fn source_id(object: &Map<String, Value>) -> Result<String, LegacyRuleError> {
    match object.get("perguntaId") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(id.trim().to_string()),
        Some(Value::String(_)) | None => Err(LegacyRuleError::MissingField("perguntaId")),
        Some(_) => Err(LegacyRuleError::InvalidField("perguntaId")),
    }
}

fn value_list(object: &Map<String, Value>, field: &'static str) -> Result<Vec<Value>, LegacyRuleError> {
    let values = match object.get(field) {
        None => return Err(LegacyRuleError::MissingField(field)),
        Some(Value::Array(values)) => values.clone(),
        Some(Value::Null) => return Err(LegacyRuleError::InvalidField(field)),
        Some(single) => vec![single.clone()],
    };
    if values.is_empty() {
        return Err(LegacyRuleError::NoValues);
    }
    Ok(values)
}

fn threshold(condition: &Map<String, Value>, operator: &str) -> Result<f64, LegacyRuleError> {
    let values = value_list(condition, "valores")?;
    match values.as_slice() {
        [single] => as_number(single).ok_or_else(|| LegacyRuleError::InvalidThreshold {
            operator: operator.to_string(),
        }),
        _ => Err(LegacyRuleError::InvalidThreshold {
            operator: operator.to_string(),
        }),
    }
}
