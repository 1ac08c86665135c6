use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::compose::ComposedQuestionnaire;
use crate::rule::as_number;
use crate::spec::question::{AnswerType, QuestionDefinition};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid e-mail pattern"));
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ().-]{8,20}$").expect("valid phone pattern"));
static DOCUMENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9./-]{4,32}$").expect("valid document id pattern"));

/// Optional metadata paired with an `AnswerSet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// In-progress answers keyed by question id. Owned and persisted by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub catalog_version: Option<Version>,
    #[serde(default)]
    pub answers: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh empty answer set bound to the questionnaire's catalog version.
    pub fn for_questionnaire(questionnaire: &ComposedQuestionnaire) -> Self {
        let now = now_rfc3339();
        Self {
            catalog_version: Some(questionnaire.catalog_version().clone()),
            answers: BTreeMap::new(),
            meta: Some(Meta {
                created_at: now.clone(),
                updated_at: now,
            }),
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&Value> {
        self.answers.get(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: Value) -> Option<Value> {
        self.answers.insert(question_id.into(), value)
    }

    pub fn remove(&mut self, question_id: &str) -> Option<Value> {
        self.answers.remove(question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.answers.iter()
    }

    /// Refreshes `meta.updated_at`.
    pub fn touch(&mut self) {
        let now = now_rfc3339();
        match self.meta.as_mut() {
            Some(meta) => meta.updated_at = now,
            None => {
                self.meta = Some(Meta {
                    created_at: now.clone(),
                    updated_at: now,
                })
            }
        }
    }

    /// Whether answers collected against the recorded catalog version can be reused with
    /// `current` (caret compatibility). Unversioned sets are always accepted.
    pub fn is_compatible_with(&self, current: &Version) -> bool {
        let Some(recorded) = &self.catalog_version else {
            return true;
        };
        VersionReq::parse(&format!("^{}", recorded)).is_ok_and(|req| req.matches(current))
    }

    /// Serializes the answer set as canonical CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>, ciborium::ser::Error<std::io::Error>> {
        let mut out = Vec::new();
        ciborium::into_writer(self, &mut out)?;
        Ok(out)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, ciborium::de::Error<std::io::Error>> {
        ciborium::from_reader(bytes)
    }

    /// Serializes the answer set as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            catalog_version: None,
            answers: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            meta: None,
        }
    }
}

/// Non-fatal problems with submitted answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerWarning {
    /// The value does not fit the declared type and is treated as unanswered.
    Malformed {
        question_id: String,
        expected: AnswerType,
    },
    /// The answer refers to a question that is not part of the briefing.
    UnknownQuestion { question_id: String },
}

impl std::fmt::Display for AnswerWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerWarning::Malformed {
                question_id,
                expected,
            } => write!(f, "answer to '{}' is not a valid {}", question_id, expected),
            AnswerWarning::UnknownQuestion { question_id } => {
                write!(f, "answer to unknown question '{}'", question_id)
            }
        }
    }
}

/// Whether `value` is acceptable for the question's declared answer type.
pub fn conforms(question: &QuestionDefinition, value: &Value) -> bool {
    match question.answer_type {
        AnswerType::ShortText | AnswerType::LongText => value.is_string(),
        AnswerType::Number | AnswerType::Currency => as_number(value).is_some(),
        AnswerType::Date => value.as_str().is_some_and(is_date),
        AnswerType::SingleSelect => value.as_str().is_some_and(|text| allows(question, text)),
        AnswerType::MultiSelect => value.as_array().is_some_and(|items| {
            items
                .iter()
                .all(|item| item.as_str().is_some_and(|text| allows(question, text)))
        }),
        AnswerType::Boolean => value.is_boolean(),
        AnswerType::Address => value.is_string() || value.is_object(),
        AnswerType::Phone => value.as_str().is_some_and(|text| PHONE.is_match(text.trim())),
        AnswerType::Email => value.as_str().is_some_and(|text| EMAIL.is_match(text.trim())),
        AnswerType::DocumentId => value
            .as_str()
            .is_some_and(|text| DOCUMENT_ID.is_match(text.trim())),
    }
}

fn allows(question: &QuestionDefinition, text: &str) -> bool {
    question.options.is_empty() || question.options.iter().any(|option| option == text)
}

fn is_date(text: &str) -> bool {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]")).is_ok()
}

fn now_rfc3339() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}
