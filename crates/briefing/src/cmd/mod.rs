pub mod compose;
pub mod lint;
pub mod resolve;
pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use briefing_spec::{Catalog, Configuration, QualityTier, RespondentType};
use clap::Args;

/// Configuration dimensions plus the catalog to compose from.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    #[arg(long, value_name = "CODE", default_value = "ARCHITECTURE")]
    pub discipline: String,
    #[arg(long, value_name = "CODE")]
    pub area: String,
    #[arg(long, value_name = "CODE")]
    pub typology: String,
    /// SIMPLE, MEDIUM or HIGH (case-insensitive)
    #[arg(long, value_name = "TIER", default_value = "SIMPLE")]
    pub tier: QualityTier,
    /// individual or organization
    #[arg(long, value_name = "TYPE", default_value = "individual")]
    pub respondent: RespondentType,
    /// Catalog directory or file; the built-in catalog when omitted
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

impl TargetArgs {
    pub fn configuration(&self) -> Configuration {
        Configuration::new(
            &self.discipline,
            &self.area,
            &self.typology,
            self.tier,
            self.respondent,
        )
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        load_catalog(self.catalog.as_deref())
    }
}

pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => briefing_catalog::load_dir(path)
            .with_context(|| format!("failed to load catalog from {}", path.display())),
        None => briefing_catalog::load_builtin().context("built-in catalog is invalid"),
    }
}
