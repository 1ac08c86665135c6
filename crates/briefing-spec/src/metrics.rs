use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compose::ComposedQuestionnaire;
use crate::resolve::ResolvedState;

/// Time weights and baseline used by [`compute_metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MetricsSettings {
    /// Size of the unconditional "ask everything" briefing for the same domain.
    pub baseline_question_count: usize,
    /// Minutes budgeted per unanswered required question.
    pub required_minutes: f64,
    /// Minutes budgeted per unanswered optional question.
    pub optional_minutes: f64,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            baseline_question_count: 230,
            required_minutes: 2.0,
            optional_minutes: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{field} must be a finite, non-negative number of minutes (got {value})")]
    InvalidWeight { field: &'static str, value: f64 },
}

impl MetricsSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("required_minutes", self.required_minutes),
            ("optional_minutes", self.optional_minutes),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::InvalidWeight { field, value });
            }
        }
        Ok(())
    }
}

/// Progress counters over active questions only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub total_active: usize,
    pub required_active: usize,
    pub optional_active: usize,
    pub answered_count: usize,
    pub completion_percent: f64,
    pub estimated_remaining_minutes: f64,
    pub reduction_ratio: f64,
}

/// Computes progress for a resolved state.
///
/// Completion is `answered / (required active + answered optional)`, not
/// `answered / total_active`. Unanswered optional questions never count
/// against it, so one answered required question next to nine open optional
/// ones reads as 100% while `total_active` is 10. Newly activated required
/// questions do lower it. An empty denominator reads as 100%.
pub fn compute_metrics(
    questionnaire: &ComposedQuestionnaire,
    resolved: &ResolvedState,
    settings: &MetricsSettings,
) -> Metrics {
    let mut required_active = 0usize;
    let mut optional_active = 0usize;
    let mut answered_required = 0usize;
    let mut answered_optional = 0usize;

    for (question, status) in questionnaire.questions().iter().zip(resolved.statuses()) {
        if !status.active {
            continue;
        }
        match (question.required, status.answered) {
            (true, true) => {
                required_active += 1;
                answered_required += 1;
            }
            (true, false) => required_active += 1,
            (false, true) => {
                optional_active += 1;
                answered_optional += 1;
            }
            (false, false) => optional_active += 1,
        }
    }

    let total_active = required_active + optional_active;
    let answered_count = answered_required + answered_optional;
    let denominator = required_active + answered_optional;
    let completion_percent = if denominator == 0 {
        100.0
    } else {
        answered_count as f64 * 100.0 / denominator as f64
    };
    let estimated_remaining_minutes = (required_active - answered_required) as f64
        * settings.required_minutes
        + (optional_active - answered_optional) as f64 * settings.optional_minutes;
    let reduction_ratio = if settings.baseline_question_count == 0 {
        0.0
    } else {
        1.0 - total_active as f64 / settings.baseline_question_count as f64
    };

    Metrics {
        total_active,
        required_active,
        optional_active,
        answered_count,
        completion_percent,
        estimated_remaining_minutes,
        reduction_ratio,
    }
}
