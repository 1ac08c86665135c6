use std::collections::BTreeMap;

use semver::Version;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::spec::block::HierarchyLevel;
use crate::spec::config::Configuration;
use crate::spec::question::QuestionDefinition;
use crate::validate::{AuthoringIssue, evaluation_order};

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("catalog authoring error: {0}")]
    Authoring(#[from] AuthoringIssue),
}

/// Non-fatal findings reported alongside a composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComposeWarning {
    /// No block is registered for this level and configuration.
    EmptyLevel {
        level: HierarchyLevel,
        selectors: Vec<String>,
    },
    /// A later block re-declared an identical question; the first occurrence was kept.
    Redeclared {
        question_id: String,
        first_block: String,
        block_id: String,
    },
    /// The rule source is not part of this composition, so the question stays inactive.
    DetachedDependency {
        question_id: String,
        depends_on: String,
    },
}

impl std::fmt::Display for ComposeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComposeWarning::EmptyLevel { level, selectors } => write!(
                f,
                "no {} block registered for {}",
                level,
                selectors.join(", ")
            ),
            ComposeWarning::Redeclared {
                question_id,
                first_block,
                block_id,
            } => write!(
                f,
                "question '{}' from '{}' already composed from '{}'",
                question_id, block_id, first_block
            ),
            ComposeWarning::DetachedDependency {
                question_id,
                depends_on,
            } => write!(
                f,
                "question '{}' depends on '{}' which is not part of this briefing",
                question_id, depends_on
            ),
        }
    }
}

/// Flat, ordered briefing template for one configuration. Never mutated after composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedQuestionnaire {
    configuration: Configuration,
    catalog_version: Version,
    catalog_digest: String,
    questions: Vec<QuestionDefinition>,
    #[serde(skip)]
    positions: BTreeMap<String, usize>,
    #[serde(skip)]
    evaluation_order: Vec<usize>,
}

impl ComposedQuestionnaire {
    /// Builds a questionnaire from an explicit question list, outside any catalog.
    pub fn from_questions(
        configuration: Configuration,
        questions: Vec<QuestionDefinition>,
    ) -> Result<Self, ComposeError> {
        let mut positions = BTreeMap::new();
        for (idx, question) in questions.iter().enumerate() {
            if positions.insert(question.id.clone(), idx).is_some() {
                return Err(AuthoringIssue::DuplicateQuestionId {
                    question_id: question.id.clone(),
                }
                .into());
            }
        }
        Self::build(
            configuration,
            Version::new(0, 0, 0),
            String::new(),
            questions,
            positions,
        )
    }

    fn build(
        configuration: Configuration,
        catalog_version: Version,
        catalog_digest: String,
        questions: Vec<QuestionDefinition>,
        positions: BTreeMap<String, usize>,
    ) -> Result<Self, ComposeError> {
        let evaluation_order = evaluation_order(&questions)
            .map_err(|chain| AuthoringIssue::DependencyCycle { chain })?;
        Ok(Self {
            configuration,
            catalog_version,
            catalog_digest,
            questions,
            positions,
            evaluation_order,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn catalog_version(&self) -> &Version {
        &self.catalog_version
    }

    pub fn catalog_digest(&self) -> &str {
        &self.catalog_digest
    }

    pub fn questions(&self) -> &[QuestionDefinition] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&QuestionDefinition> {
        self.position(id).map(|idx| &self.questions[idx])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.questions.iter().map(|q| q.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question indices with every rule source ahead of its dependants.
    pub(crate) fn evaluation_order(&self) -> &[usize] {
        &self.evaluation_order
    }
}

/// Result of composing a configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Composition {
    pub questionnaire: ComposedQuestionnaire,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ComposeWarning>,
}

impl Composition {
    /// Levels that contributed nothing for this configuration.
    pub fn empty_levels(&self) -> Vec<HierarchyLevel> {
        self.warnings
            .iter()
            .filter_map(|warning| match warning {
                ComposeWarning::EmptyLevel { level, .. } => Some(*level),
                _ => None,
            })
            .collect()
    }
}

/// Flattens the catalog blocks that apply to `config` into one questionnaire.
///
/// Levels are visited global -> discipline -> area -> typology -> tier and
/// blocks in declaration order; the first occurrence of a question id wins.
pub fn compose(catalog: &Catalog, config: &Configuration) -> Result<Composition, ComposeError> {
    let mut questions: Vec<QuestionDefinition> = Vec::new();
    let mut origins: BTreeMap<String, (usize, String)> = BTreeMap::new();
    let mut warnings = Vec::new();

    for level in HierarchyLevel::ALL {
        let selectors = config.selectors(level);
        let mut matched = 0usize;

        for selector in &selectors {
            for block in catalog.blocks(level, selector) {
                matched += 1;
                for question in block.content.for_respondent(config.respondent_type) {
                    if let Some((position, first_block)) = origins.get(&question.id).cloned() {
                        if !questions[position].materially_eq(question) {
                            return Err(AuthoringIssue::DivergentQuestion {
                                question_id: question.id.clone(),
                                first_block,
                                block_id: block.id.clone(),
                            }
                            .into());
                        }
                        warnings.push(ComposeWarning::Redeclared {
                            question_id: question.id.clone(),
                            first_block,
                            block_id: block.id.clone(),
                        });
                        continue;
                    }
                    origins.insert(question.id.clone(), (questions.len(), block.id.clone()));
                    questions.push(question.clone());
                }
            }
        }

        if matched == 0 {
            warn!(%level, selectors = ?selectors, "no briefing block for configuration level");
            warnings.push(ComposeWarning::EmptyLevel { level, selectors });
        }
    }

    let positions = origins
        .into_iter()
        .map(|(id, (position, _))| (id, position))
        .collect();
    let questionnaire = ComposedQuestionnaire::build(
        config.clone(),
        catalog.version().clone(),
        catalog.digest().to_string(),
        questions,
        positions,
    )?;

    for question in questionnaire.questions() {
        if let Some(rule) = &question.depends_on
            && !questionnaire.contains(&rule.question_id)
        {
            warn!(
                question = %question.id,
                depends_on = %rule.question_id,
                "dependency source not composed"
            );
            warnings.push(ComposeWarning::DetachedDependency {
                question_id: question.id.clone(),
                depends_on: rule.question_id.clone(),
            });
        }
    }

    debug!(
        configuration = %config,
        questions = questionnaire.len(),
        warnings = warnings.len(),
        "briefing composed"
    );

    Ok(Composition {
        questionnaire,
        warnings,
    })
}
