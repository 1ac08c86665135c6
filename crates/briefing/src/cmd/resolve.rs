use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use briefing_spec::{
    AnswerSet, AnswerWarning, BriefingPlan, Configuration, Metrics, compose, plan_submit_all,
};
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use super::TargetArgs;
use crate::config::EngineConfig;

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Answer set JSON: either `{ "answers": {...} }` or a flat id -> value object
    #[arg(long = "answers", value_name = "answers.json")]
    pub answers: PathBuf,
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ResolveReport<'a> {
    configuration: &'a Configuration,
    metrics: &'a Metrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_question: Option<&'a str>,
    display_order: &'a [String],
    inactive: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stale: Vec<&'a str>,
    #[serde(skip_serializing_if = "is_empty")]
    warnings: &'a [AnswerWarning],
    #[serde(skip_serializing_if = "is_empty")]
    errors: &'a [String],
}

pub fn run(args: ResolveArgs, config_path: Option<&Path>) -> Result<()> {
    let engine = EngineConfig::load(config_path)?;
    let catalog = args.target.load_catalog()?;
    let config = args.target.configuration();
    let composition =
        compose(&catalog, &config).with_context(|| format!("failed to compose {config}"))?;
    for warning in &composition.warnings {
        tracing::info!(%warning, "composition warning");
    }

    let answers = load_answers(&args.answers)?;
    let plan = plan_submit_all(&composition.questionnaire, &answers, &engine.metrics);

    if args.json {
        let report = report(&config, &plan);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&config, &plan);
    }
    Ok(())
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

fn report<'a>(config: &'a Configuration, plan: &'a BriefingPlan) -> ResolveReport<'a> {
    ResolveReport {
        configuration: config,
        metrics: &plan.metrics,
        next_question: plan.next_question.as_deref(),
        display_order: plan.resolved.display_order(),
        inactive: plan.resolved.inactive_ids(),
        stale: plan.resolved.stale_ids(),
        warnings: plan.resolved.warnings(),
        errors: &plan.errors,
    }
}

fn print_summary(config: &Configuration, plan: &BriefingPlan) {
    for error in &plan.errors {
        eprintln!("error: {error}");
    }
    for warning in plan.resolved.warnings() {
        eprintln!("warning: {warning}");
    }
    let metrics = &plan.metrics;
    println!("{config}");
    println!(
        "active {} ({} required, {} optional), answered {}",
        metrics.total_active,
        metrics.required_active,
        metrics.optional_active,
        metrics.answered_count
    );
    println!(
        "completion {:.1}%, about {:.0} min remaining, {:.1}% shorter than the full briefing",
        metrics.completion_percent,
        metrics.estimated_remaining_minutes,
        metrics.reduction_ratio * 100.0
    );
    match &plan.next_question {
        Some(next) => println!("next: {next}"),
        None => println!("next: (complete)"),
    }
    let stale = plan.resolved.stale_ids();
    if !stale.is_empty() {
        println!("stale: {}", stale.join(", "));
    }
}

/// Reads an answer set, accepting the flat `{ id: value }` form as well.
pub fn load_answers(path: &Path) -> Result<AnswerSet> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read answers {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("answers {} are not valid JSON", path.display()))?;
    let wrapped = value
        .as_object()
        .is_some_and(|object| object.get("answers").is_some_and(Value::is_object));
    if wrapped {
        return serde_json::from_value(value)
            .with_context(|| format!("answers {} are not a valid answer set", path.display()));
    }
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => anyhow::bail!("answers {} must be a JSON object", path.display()),
    }
}
