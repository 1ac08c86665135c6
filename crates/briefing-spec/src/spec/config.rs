use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::{GLOBAL_SELECTOR, tier_selector};
use crate::spec::block::HierarchyLevel;

/// Quality/complexity tier of a project. Higher tiers extend lower ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityTier {
    Simple,
    Medium,
    High,
}

impl QualityTier {
    pub const ALL: [QualityTier; 3] = [QualityTier::Simple, QualityTier::Medium, QualityTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Simple => "SIMPLE",
            QualityTier::Medium => "MEDIUM",
            QualityTier::High => "HIGH",
        }
    }

    /// Every tier up to and including `self`, lowest first.
    pub fn cumulative(self) -> impl Iterator<Item = QualityTier> {
        Self::ALL.into_iter().filter(move |tier| *tier <= self)
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SIMPLE" => Ok(QualityTier::Simple),
            "MEDIUM" => Ok(QualityTier::Medium),
            "HIGH" => Ok(QualityTier::High),
            other => Err(format!(
                "unknown quality tier '{other}' (expected SIMPLE, MEDIUM or HIGH)"
            )),
        }
    }
}

/// Who the briefing is answered on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RespondentType {
    Individual,
    Organization,
}

impl RespondentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RespondentType::Individual => "individual",
            RespondentType::Organization => "organization",
        }
    }
}

impl std::fmt::Display for RespondentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RespondentType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(RespondentType::Individual),
            "organization" => Ok(RespondentType::Organization),
            other => Err(format!(
                "unknown respondent type '{other}' (expected individual or organization)"
            )),
        }
    }
}

/// The five dimensions that select which catalog blocks apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Configuration {
    pub discipline: String,
    pub area: String,
    pub typology: String,
    pub quality_tier: QualityTier,
    pub respondent_type: RespondentType,
}

impl Configuration {
    pub fn new(
        discipline: impl Into<String>,
        area: impl Into<String>,
        typology: impl Into<String>,
        quality_tier: QualityTier,
        respondent_type: RespondentType,
    ) -> Self {
        Self {
            discipline: discipline.into(),
            area: area.into(),
            typology: typology.into(),
            quality_tier,
            respondent_type,
        }
    }

    /// Same configuration at a different tier.
    pub fn with_tier(&self, quality_tier: QualityTier) -> Self {
        Self {
            quality_tier,
            ..self.clone()
        }
    }

    /// Selector keys looked up for `level`, in composition order.
    ///
    /// The tier level is cumulative: every tier up to the configured one is
    /// selected for the configured typology.
    pub fn selectors(&self, level: HierarchyLevel) -> Vec<String> {
        match level {
            HierarchyLevel::Global => vec![GLOBAL_SELECTOR.to_string()],
            HierarchyLevel::Discipline => vec![self.discipline.clone()],
            HierarchyLevel::Area => vec![self.area.clone()],
            HierarchyLevel::Typology => vec![self.typology.clone()],
            HierarchyLevel::Tier => self
                .quality_tier
                .cumulative()
                .map(|tier| tier_selector(&self.typology, tier))
                .collect(),
        }
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{} ({})",
            self.discipline, self.area, self.typology, self.quality_tier, self.respondent_type
        )
    }
}
