use anyhow::{Context, Result};
use briefing_spec::compose;
use clap::Args;

use super::TargetArgs;

#[derive(Args, Debug, Clone)]
pub struct ComposeArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Print the full composition (questions and warnings) as JSON
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

pub fn run(args: ComposeArgs) -> Result<()> {
    let catalog = args.target.load_catalog()?;
    let config = args.target.configuration();
    let composition =
        compose(&catalog, &config).with_context(|| format!("failed to compose {config}"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&composition)?);
        return Ok(());
    }

    for warning in &composition.warnings {
        eprintln!("warning: {warning}");
    }
    let questionnaire = &composition.questionnaire;
    println!(
        "{} ({} questions, catalog {})",
        config,
        questionnaire.len(),
        questionnaire.catalog_version()
    );
    for question in questionnaire.questions() {
        let marker = if question.required { "*" } else { " " };
        let gate = question
            .depends_on
            .as_ref()
            .map(|rule| format!("  [if {} {}]", rule.question_id, rule.condition.operator()))
            .unwrap_or_default();
        println!("{marker} {:<32} {}{gate}", question.id, question.answer_type);
    }
    Ok(())
}
