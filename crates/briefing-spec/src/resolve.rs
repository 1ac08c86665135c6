use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::answers::{AnswerSet, AnswerWarning, conforms};
use crate::compose::ComposedQuestionnaire;
use crate::rule::is_filled;

/// Per-question outcome of a resolution pass, in composed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionStatus {
    pub id: String,
    pub active: bool,
    pub required: bool,
    /// Active and holding a well-formed, non-blank answer.
    pub answered: bool,
    /// Inactive but still holding an answer; excluded from every count.
    pub stale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// Active questions of one display section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: Option<String>,
    pub question_ids: Vec<String>,
}

/// Derived view of a questionnaire under an answer set. Recomputed on every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedState {
    statuses: Vec<QuestionStatus>,
    display_order: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<AnswerWarning>,
}

impl ResolvedState {
    pub fn statuses(&self) -> &[QuestionStatus] {
        &self.statuses
    }

    pub fn status(&self, id: &str) -> Option<&QuestionStatus> {
        self.statuses.iter().find(|status| status.id == id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.status(id).is_some_and(|status| status.active)
    }

    pub fn active_ids(&self) -> Vec<&str> {
        self.ids_where(|status| status.active)
    }

    pub fn inactive_ids(&self) -> Vec<&str> {
        self.ids_where(|status| !status.active)
    }

    pub fn answered_ids(&self) -> Vec<&str> {
        self.ids_where(|status| status.answered)
    }

    pub fn unanswered_ids(&self) -> Vec<&str> {
        self.ids_where(|status| status.active && !status.answered)
    }

    pub fn required_ids(&self) -> Vec<&str> {
        self.ids_where(|status| status.active && status.required)
    }

    pub fn optional_ids(&self) -> Vec<&str> {
        self.ids_where(|status| status.active && !status.required)
    }

    pub fn stale_ids(&self) -> Vec<&str> {
        self.ids_where(|status| status.stale)
    }

    /// Active ids grouped by section (sections in first-appearance order).
    pub fn display_order(&self) -> &[String] {
        &self.display_order
    }

    pub fn sections(&self) -> Vec<Section> {
        let mut sections: Vec<Section> = Vec::new();
        for status in self.statuses.iter().filter(|status| status.active) {
            match sections
                .iter_mut()
                .find(|section| section.name == status.section)
            {
                Some(section) => section.question_ids.push(status.id.clone()),
                None => sections.push(Section {
                    name: status.section.clone(),
                    question_ids: vec![status.id.clone()],
                }),
            }
        }
        sections
    }

    pub fn warnings(&self) -> &[AnswerWarning] {
        &self.warnings
    }

    /// First unanswered active required question, else the first unanswered active optional one.
    pub fn next_question(&self) -> Option<&str> {
        let pending = |required: bool| {
            self.statuses
                .iter()
                .find(|status| status.active && !status.answered && status.required == required)
                .map(|status| status.id.as_str())
        };
        pending(true).or_else(|| pending(false))
    }

    fn ids_where<F>(&self, predicate: F) -> Vec<&str>
    where
        F: Fn(&QuestionStatus) -> bool,
    {
        self.statuses
            .iter()
            .filter(|status| predicate(status))
            .map(|status| status.id.as_str())
            .collect()
    }
}

/// Computes which questions are active under `answers`.
///
/// A question without a rule is always active. A question with a rule is
/// active only while its source is active and the rule holds against the
/// source's answer, so deactivation propagates down dependency chains.
/// Malformed answers count as absent.
pub fn resolve_active(questionnaire: &ComposedQuestionnaire, answers: &AnswerSet) -> ResolvedState {
    let questions = questionnaire.questions();
    let mut warnings = Vec::new();

    let accepted: Vec<Option<&Value>> = questions
        .iter()
        .map(|question| match answers.get(&question.id) {
            None => None,
            Some(value) if value.is_null() => None,
            Some(value) if conforms(question, value) => Some(value),
            Some(_) => {
                warn!(question = %question.id, expected = %question.answer_type, "malformed answer ignored");
                warnings.push(AnswerWarning::Malformed {
                    question_id: question.id.clone(),
                    expected: question.answer_type,
                });
                None
            }
        })
        .collect();

    for (question_id, _) in answers.iter() {
        if !questionnaire.contains(question_id) {
            warnings.push(AnswerWarning::UnknownQuestion {
                question_id: question_id.clone(),
            });
        }
    }

    let mut active = vec![false; questions.len()];
    for &idx in questionnaire.evaluation_order() {
        active[idx] = match &questions[idx].depends_on {
            None => true,
            Some(rule) => match questionnaire.position(&rule.question_id) {
                Some(source) => active[source] && rule.evaluate(accepted[source]),
                None => false,
            },
        };
    }

    let statuses: Vec<QuestionStatus> = questions
        .iter()
        .enumerate()
        .map(|(idx, question)| QuestionStatus {
            id: question.id.clone(),
            active: active[idx],
            required: question.required,
            answered: active[idx] && accepted[idx].is_some_and(is_filled),
            stale: !active[idx]
                && answers
                    .get(&question.id)
                    .is_some_and(|value| !value.is_null()),
            section: question.section.clone(),
        })
        .collect();

    let mut state = ResolvedState {
        statuses,
        display_order: Vec::new(),
        warnings,
    };
    state.display_order = state
        .sections()
        .into_iter()
        .flat_map(|section| section.question_ids)
        .collect();

    debug!(
        active = state.display_order.len(),
        total = questions.len(),
        warnings = state.warnings.len(),
        "briefing resolved"
    );

    state
}
