use std::collections::BTreeMap;

use schemars::JsonSchema;
use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::spec::block::{Block, HierarchyLevel};
use crate::spec::config::QualityTier;
use crate::spec::question::QuestionDefinition;
use crate::validate::{AuthoringIssue, validate_blocks};

/// Selector under which global blocks are indexed.
pub const GLOBAL_SELECTOR: &str = "*";

/// Composite selector for tier blocks, e.g. `SINGLE_FAMILY_HOME/MEDIUM`.
pub fn tier_selector(typology: &str, tier: QualityTier) -> String {
    format!("{}/{}", typology, tier.as_str())
}

/// Reads a tier selector, accepting only the exact form [`tier_selector`] produces.
pub(crate) fn parse_tier_selector(selector: &str) -> Option<(&str, QualityTier)> {
    let (typology, tier) = selector.rsplit_once('/')?;
    if typology.is_empty() || typology.trim() != typology {
        return None;
    }
    let tier: QualityTier = tier.parse().ok()?;
    (selector == tier_selector(typology, tier)).then_some((typology, tier))
}

/// Serialized form of a catalog: a version plus its blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogDocument {
    #[schemars(with = "String")]
    pub version: Version,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl CatalogDocument {
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no catalog documents were supplied")]
    Empty,
    #[error("catalog failed validation with {} issue(s)", .issues.len())]
    Authoring { issues: Vec<AuthoringIssue> },
}

/// Validated, read-only block collection indexed by `(level, selector)`.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: Version,
    digest: String,
    blocks: Vec<Block>,
    index: BTreeMap<(HierarchyLevel, String), Vec<usize>>,
    questions: BTreeMap<String, (usize, usize)>,
}

impl Catalog {
    /// Validates and indexes a single document.
    pub fn new(document: CatalogDocument) -> Result<Self, CatalogError> {
        let issues = validate_blocks(&document.blocks);
        if !issues.is_empty() {
            return Err(CatalogError::Authoring { issues });
        }

        let digest = hex::encode(blake3::hash(&serde_json::to_vec(&document)?).as_bytes());
        let mut index: BTreeMap<(HierarchyLevel, String), Vec<usize>> = BTreeMap::new();
        let mut questions = BTreeMap::new();

        for (block_idx, block) in document.blocks.iter().enumerate() {
            let selectors = if block.level == HierarchyLevel::Global {
                vec![GLOBAL_SELECTOR.to_string()]
            } else {
                block.selectors.clone()
            };
            for selector in selectors {
                index.entry((block.level, selector)).or_default().push(block_idx);
            }
            for (question_idx, question) in block.content.all().enumerate() {
                questions
                    .entry(question.id.clone())
                    .or_insert((block_idx, question_idx));
            }
        }

        debug!(
            version = %document.version,
            blocks = document.blocks.len(),
            questions = questions.len(),
            "catalog indexed"
        );

        Ok(Self {
            version: document.version,
            digest,
            blocks: document.blocks,
            index,
            questions,
        })
    }

    /// Merges several documents (blocks appended in the given order) under the highest version.
    pub fn from_documents<I>(documents: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = CatalogDocument>,
    {
        let mut merged: Option<CatalogDocument> = None;
        for document in documents {
            match merged.as_mut() {
                None => merged = Some(document),
                Some(target) => {
                    if document.version > target.version {
                        target.version = document.version;
                    }
                    target.blocks.extend(document.blocks);
                }
            }
        }
        Self::new(merged.ok_or(CatalogError::Empty)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        Self::new(CatalogDocument::from_json_str(raw)?)
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Hex blake3 digest of the canonical JSON document.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Blocks registered for `(level, selector)` in declaration order; empty when none match.
    pub fn blocks(&self, level: HierarchyLevel, selector: &str) -> Vec<&Block> {
        self.index
            .get(&(level, selector.to_string()))
            .map(|indices| indices.iter().map(|idx| &self.blocks[*idx]).collect())
            .unwrap_or_default()
    }

    pub fn all_blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// First declaration of a question id anywhere in the catalog.
    pub fn question(&self, id: &str) -> Option<&QuestionDefinition> {
        let (block_idx, question_idx) = self.questions.get(id)?;
        self.blocks[*block_idx].content.all().nth(*question_idx)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Distinct selectors registered for a level, sorted.
    pub fn selectors(&self, level: HierarchyLevel) -> Vec<&str> {
        self.index
            .keys()
            .filter(|(key_level, _)| *key_level == level)
            .map(|(_, selector)| selector.as_str())
            .collect()
    }
}
