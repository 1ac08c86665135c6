use anyhow::Result;
use briefing_spec::{AnswerSet, CatalogDocument};
use clap::{Args, ValueEnum};

use crate::config::EngineConfig;

#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    #[arg(value_enum, default_value = "catalog")]
    pub target: SchemaTarget,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaTarget {
    /// Catalog document (`version` + `blocks`)
    Catalog,
    /// Answer set persisted by callers
    Answers,
    /// `briefing.toml`
    Config,
}

pub fn run(args: SchemaArgs) -> Result<()> {
    let schema = match args.target {
        SchemaTarget::Catalog => schemars::schema_for!(CatalogDocument),
        SchemaTarget::Answers => schemars::schema_for!(AnswerSet),
        SchemaTarget::Config => schemars::schema_for!(EngineConfig),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
