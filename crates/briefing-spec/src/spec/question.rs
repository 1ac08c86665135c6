use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rule::DependencyRule;

/// Supported answer data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    ShortText,
    LongText,
    Number,
    Currency,
    Date,
    SingleSelect,
    MultiSelect,
    Boolean,
    Address,
    Phone,
    Email,
    DocumentId,
}

impl AnswerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerType::ShortText => "short_text",
            AnswerType::LongText => "long_text",
            AnswerType::Number => "number",
            AnswerType::Currency => "currency",
            AnswerType::Date => "date",
            AnswerType::SingleSelect => "single_select",
            AnswerType::MultiSelect => "multi_select",
            AnswerType::Boolean => "boolean",
            AnswerType::Address => "address",
            AnswerType::Phone => "phone",
            AnswerType::Email => "email",
            AnswerType::DocumentId => "document_id",
        }
    }

    /// Select types must carry an option list.
    pub fn is_select(&self) -> bool {
        matches!(self, AnswerType::SingleSelect | AnswerType::MultiSelect)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, AnswerType::Number | AnswerType::Currency)
    }

    /// Structured types carry a recognisable shape (address, phone, e-mail, document id).
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            AnswerType::Address | AnswerType::Phone | AnswerType::Email | AnswerType::DocumentId
        )
    }
}

impl std::fmt::Display for AnswerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition of a single briefing question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionDefinition {
    pub id: String,
    pub prompt: String,
    #[serde(rename = "type")]
    pub answer_type: AnswerType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependencyRule>,
}

impl QuestionDefinition {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, answer_type: AnswerType) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            answer_type,
            options: Vec::new(),
            required: false,
            help: None,
            section: None,
            depends_on: None,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_rule(mut self, rule: DependencyRule) -> Self {
        self.depends_on = Some(rule);
        self
    }

    /// Compares everything except `section`, which only affects display grouping.
    pub fn materially_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.prompt == other.prompt
            && self.answer_type == other.answer_type
            && self.options == other.options
            && self.required == other.required
            && self.help == other.help
            && self.depends_on == other.depends_on
    }
}
