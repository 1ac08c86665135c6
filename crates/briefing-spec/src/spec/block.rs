use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::config::RespondentType;
use crate::spec::question::QuestionDefinition;

/// Inheritance levels, in composition order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyLevel {
    Global,
    Discipline,
    Area,
    Typology,
    Tier,
}

impl HierarchyLevel {
    pub const ALL: [HierarchyLevel; 5] = [
        HierarchyLevel::Global,
        HierarchyLevel::Discipline,
        HierarchyLevel::Area,
        HierarchyLevel::Typology,
        HierarchyLevel::Tier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyLevel::Global => "global",
            HierarchyLevel::Discipline => "discipline",
            HierarchyLevel::Area => "area",
            HierarchyLevel::Typology => "typology",
            HierarchyLevel::Tier => "tier",
        }
    }
}

impl std::fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Question lists carried by a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BlockContent {
    /// One list for every respondent type.
    Shared(Vec<QuestionDefinition>),
    /// Parallel lists when wording or requirements differ by respondent type.
    ByRespondent {
        #[serde(default)]
        individual: Vec<QuestionDefinition>,
        #[serde(default)]
        organization: Vec<QuestionDefinition>,
    },
}

impl BlockContent {
    pub fn for_respondent(&self, respondent: RespondentType) -> &[QuestionDefinition] {
        match self {
            BlockContent::Shared(questions) => questions,
            BlockContent::ByRespondent {
                individual,
                organization,
            } => match respondent {
                RespondentType::Individual => individual,
                RespondentType::Organization => organization,
            },
        }
    }

    /// Every declared question, both respondent branches included.
    pub fn all(&self) -> impl Iterator<Item = &QuestionDefinition> {
        let (first, second): (&[QuestionDefinition], &[QuestionDefinition]) = match self {
            BlockContent::Shared(questions) => (questions, &[]),
            BlockContent::ByRespondent {
                individual,
                organization,
            } => (individual, organization),
        };
        first.iter().chain(second.iter())
    }
}

/// Named, reusable group of questions tied to one hierarchy level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Block {
    pub id: String,
    pub level: HierarchyLevel,
    /// Configuration values that activate the block. Tier blocks use `TYPOLOGY/TIER`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<String>,
    pub content: BlockContent,
}

impl Block {
    pub fn shared(
        id: impl Into<String>,
        level: HierarchyLevel,
        selectors: &[&str],
        questions: Vec<QuestionDefinition>,
    ) -> Self {
        Self {
            id: id.into(),
            level,
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            content: BlockContent::Shared(questions),
        }
    }
}
