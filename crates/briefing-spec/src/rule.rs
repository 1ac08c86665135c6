use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gate attached to a question: the question is active only while the
/// condition holds against the current answer of `question_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DependencyRule {
    pub question_id: String,
    #[serde(flatten)]
    pub condition: Condition,
}

/// Comparison applied to the referenced answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "operator", rename_all = "snake_case")]
pub enum Condition {
    Equals { value: Value },
    NotEquals { value: Value },
    Includes { values: Vec<Value> },
    Excludes { values: Vec<Value> },
    GreaterThan { value: f64 },
    LessThan { value: f64 },
    NotEmpty,
}

impl DependencyRule {
    pub fn new(question_id: impl Into<String>, condition: Condition) -> Self {
        Self {
            question_id: question_id.into(),
            condition,
        }
    }

    pub fn equals(question_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(
            question_id,
            Condition::Equals {
                value: value.into(),
            },
        )
    }

    pub fn includes<I, V>(question_id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(
            question_id,
            Condition::Includes {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn greater_than(question_id: impl Into<String>, value: f64) -> Self {
        Self::new(question_id, Condition::GreaterThan { value })
    }

    pub fn not_empty(question_id: impl Into<String>) -> Self {
        Self::new(question_id, Condition::NotEmpty)
    }

    /// Evaluates the rule against the referenced answer (`None` when unanswered).
    pub fn evaluate(&self, answer: Option<&Value>) -> bool {
        self.condition.evaluate(answer)
    }
}

impl Condition {
    pub fn operator(&self) -> &'static str {
        match self {
            Condition::Equals { .. } => "equals",
            Condition::NotEquals { .. } => "not_equals",
            Condition::Includes { .. } => "includes",
            Condition::Excludes { .. } => "excludes",
            Condition::GreaterThan { .. } => "greater_than",
            Condition::LessThan { .. } => "less_than",
            Condition::NotEmpty => "not_empty",
        }
    }

    /// A `null` answer is the same as no answer.
    pub fn evaluate(&self, answer: Option<&Value>) -> bool {
        let answer = answer.filter(|value| !value.is_null());
        match self {
            Condition::Equals { value } => answer.is_some_and(|answer| same_value(answer, value)),
            Condition::NotEquals { value } => {
                answer.is_some_and(|answer| !same_value(answer, value))
            }
            Condition::Includes { values } => {
                answer.is_some_and(|answer| intersects(values, answer))
            }
            Condition::Excludes { values } => {
                answer.is_some_and(|answer| !intersects(values, answer))
            }
            Condition::GreaterThan { value } => {
                answer.and_then(as_number).is_some_and(|number| number > *value)
            }
            Condition::LessThan { value } => {
                answer.and_then(as_number).is_some_and(|number| number < *value)
            }
            Condition::NotEmpty => answer.is_some_and(is_filled),
        }
    }
}

fn intersects(values: &[Value], answer: &Value) -> bool {
    let contains = |item: &Value| values.iter().any(|value| same_value(item, value));
    match answer {
        Value::Array(items) => items.iter().any(contains),
        other => contains(other),
    }
}

/// JSON equality, except that a number matches any value with the same numeric reading
/// (`3`, `3.0` and `"3"` are one answer).
fn same_value(answer: &Value, expected: &Value) -> bool {
    if answer == expected {
        return true;
    }
    if !(answer.is_number() || expected.is_number()) {
        return false;
    }
    matches!((as_number(answer), as_number(expected)), (Some(a), Some(b)) if a == b)
}

/// Numeric reading of an answer; numeric strings are accepted, everything else is not a number.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite()),
        _ => None,
    }
}

/// True when the value carries content: non-blank strings, non-empty collections, any scalar.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
