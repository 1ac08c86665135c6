use serde::Serialize;
use serde_json::Value;

use crate::answers::AnswerSet;
use crate::compose::ComposedQuestionnaire;
use crate::metrics::{Metrics, MetricsSettings, compute_metrics};
use crate::resolve::{ResolvedState, resolve_active};

/// Deterministic outcome of a submission, computed without side effects.
#[derive(Debug, Clone, Serialize)]
pub struct BriefingPlan {
    pub answers: AnswerSet,
    pub resolved: ResolvedState,
    pub metrics: Metrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl BriefingPlan {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Plans a single-answer patch. A `null` value clears the answer; unknown ids leave the
/// answer set untouched and are reported in `errors`.
pub fn plan_submit_patch(
    questionnaire: &ComposedQuestionnaire,
    answers: &AnswerSet,
    question_id: &str,
    value: Value,
    settings: &MetricsSettings,
) -> BriefingPlan {
    let mut patched = answers.clone();
    let mut errors = Vec::new();

    if !questionnaire.contains(question_id) {
        errors.push(format!("unknown question: {}", question_id));
    } else if value.is_null() {
        patched.remove(question_id);
        patched.touch();
    } else {
        patched.insert(question_id, value);
        patched.touch();
    }

    build_plan(questionnaire, patched, settings, errors)
}

/// Plans a full submission of `answers` as they are.
pub fn plan_submit_all(
    questionnaire: &ComposedQuestionnaire,
    answers: &AnswerSet,
    settings: &MetricsSettings,
) -> BriefingPlan {
    let mut errors = Vec::new();
    if !answers.is_compatible_with(questionnaire.catalog_version()) {
        errors.push(format!(
            "answers were collected against catalog {} which is incompatible with {}",
            answers
                .catalog_version
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            questionnaire.catalog_version()
        ));
    }
    build_plan(questionnaire, answers.clone(), settings, errors)
}

/// Drops answers held by questions that are currently inactive.
pub fn prune_stale(answers: &AnswerSet, resolved: &ResolvedState) -> AnswerSet {
    let mut pruned = answers.clone();
    for id in resolved.stale_ids() {
        pruned.remove(id);
    }
    pruned
}

fn build_plan(
    questionnaire: &ComposedQuestionnaire,
    answers: AnswerSet,
    settings: &MetricsSettings,
    errors: Vec<String>,
) -> BriefingPlan {
    let resolved = resolve_active(questionnaire, &answers);
    let metrics = compute_metrics(questionnaire, &resolved, settings);
    let next_question = resolved.next_question().map(str::to_string);
    BriefingPlan {
        answers,
        resolved,
        metrics,
        next_question,
        errors,
    }
}
