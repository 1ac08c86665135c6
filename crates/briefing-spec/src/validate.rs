use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::catalog::parse_tier_selector;
use crate::spec::block::{Block, HierarchyLevel};
use crate::spec::question::QuestionDefinition;

/// Content bugs that make a catalog unusable. Found once at load time, never per request.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum AuthoringIssue {
    #[error("duplicate block id '{block_id}'")]
    DuplicateBlockId { block_id: String },
    #[error(
        "question '{question_id}' is declared in '{first_block}' and again with different content in '{block_id}'"
    )]
    DivergentQuestion {
        question_id: String,
        first_block: String,
        block_id: String,
    },
    #[error("duplicate question id '{question_id}'")]
    DuplicateQuestionId { question_id: String },
    #[error("question '{question_id}' depends on unknown question '{depends_on}'")]
    DanglingDependency {
        question_id: String,
        depends_on: String,
    },
    #[error("dependency cycle detected: {}", .chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },
    #[error("{level} block '{block_id}' declares no selector")]
    MissingSelector {
        block_id: String,
        level: HierarchyLevel,
    },
    #[error(
        "tier block '{block_id}' has malformed selector '{selector}' (expected TYPOLOGY/TIER, e.g. HOUSE/SIMPLE)"
    )]
    InvalidTierSelector { block_id: String, selector: String },
    #[error(
        "global block '{block_id}' declares selector '{selector}' (global blocks apply to every configuration)"
    )]
    GlobalSelector { block_id: String, selector: String },
    #[error("select question '{question_id}' declares no options")]
    MissingOptions { question_id: String },
}

/// Lints a block set and returns every issue found, in declaration order.
pub fn validate_blocks(blocks: &[Block]) -> Vec<AuthoringIssue> {
    let mut issues = Vec::new();
    let mut block_ids = BTreeSet::new();
    let mut first_seen: BTreeMap<&str, (&QuestionDefinition, &str)> = BTreeMap::new();
    let mut unique = Vec::new();

    for block in blocks {
        if !block_ids.insert(block.id.as_str()) {
            issues.push(AuthoringIssue::DuplicateBlockId {
                block_id: block.id.clone(),
            });
        }
        check_selectors(block, &mut issues);

        for question in block.content.all() {
            if question.answer_type.is_select() && question.options.is_empty() {
                issues.push(AuthoringIssue::MissingOptions {
                    question_id: question.id.clone(),
                });
            }
            match first_seen.get(question.id.as_str()) {
                Some((first, first_block)) => {
                    if !first.materially_eq(question) {
                        issues.push(AuthoringIssue::DivergentQuestion {
                            question_id: question.id.clone(),
                            first_block: first_block.to_string(),
                            block_id: block.id.clone(),
                        });
                    }
                }
                None => {
                    first_seen.insert(question.id.as_str(), (question, block.id.as_str()));
                    unique.push(question);
                }
            }
        }
    }

    for question in &unique {
        if let Some(rule) = &question.depends_on
            && !first_seen.contains_key(rule.question_id.as_str())
        {
            issues.push(AuthoringIssue::DanglingDependency {
                question_id: question.id.clone(),
                depends_on: rule.question_id.clone(),
            });
        }
    }

    if let Err(chain) = evaluation_order(unique.iter().copied()) {
        issues.push(AuthoringIssue::DependencyCycle { chain });
    }

    issues
}

fn check_selectors(block: &Block, issues: &mut Vec<AuthoringIssue>) {
    match block.level {
        HierarchyLevel::Global => {
            for selector in &block.selectors {
                issues.push(AuthoringIssue::GlobalSelector {
                    block_id: block.id.clone(),
                    selector: selector.clone(),
                });
            }
        }
        HierarchyLevel::Tier => {
            if block.selectors.is_empty() {
                issues.push(AuthoringIssue::MissingSelector {
                    block_id: block.id.clone(),
                    level: block.level,
                });
            }
            for selector in &block.selectors {
                if parse_tier_selector(selector).is_none() {
                    issues.push(AuthoringIssue::InvalidTierSelector {
                        block_id: block.id.clone(),
                        selector: selector.clone(),
                    });
                }
            }
        }
        _ => {
            if block.selectors.iter().all(|selector| selector.trim().is_empty()) {
                issues.push(AuthoringIssue::MissingSelector {
                    block_id: block.id.clone(),
                    level: block.level,
                });
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    InProgress,
    Done,
}

/// Orders questions so that every rule source comes before its dependants.
///
/// Rules pointing outside the list are ignored here. On a cycle the offending
/// chain is returned, closed by repeating its first id.
pub fn evaluation_order<'a, I>(questions: I) -> Result<Vec<usize>, Vec<String>>
where
    I: IntoIterator<Item = &'a QuestionDefinition>,
{
    let questions: Vec<&QuestionDefinition> = questions.into_iter().collect();
    let positions: BTreeMap<&str, usize> = questions
        .iter()
        .enumerate()
        .map(|(idx, question)| (question.id.as_str(), idx))
        .collect();
    let source = |idx: usize| -> Option<usize> {
        questions[idx]
            .depends_on
            .as_ref()
            .and_then(|rule| positions.get(rule.question_id.as_str()).copied())
    };

    let mut state = vec![Visit::Pending; questions.len()];
    let mut order = Vec::with_capacity(questions.len());

    // Each question has at most one source, so a walk is a single chain.
    for start in 0..questions.len() {
        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(idx) = current {
            match state[idx] {
                Visit::Done => break,
                Visit::InProgress => {
                    let from = path.iter().position(|p| *p == idx).unwrap_or(0);
                    let mut chain: Vec<String> = path[from..]
                        .iter()
                        .map(|p: &usize| questions[*p].id.clone())
                        .collect();
                    chain.push(questions[idx].id.clone());
                    return Err(chain);
                }
                Visit::Pending => {
                    state[idx] = Visit::InProgress;
                    path.push(idx);
                    current = source(idx);
                }
            }
        }
        for idx in path.into_iter().rev() {
            state[idx] = Visit::Done;
            order.push(idx);
        }
    }

    Ok(order)
}
