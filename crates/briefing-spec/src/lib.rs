#![allow(missing_docs)]

pub mod answers;
pub mod catalog;
pub mod compose;
pub mod legacy;
pub mod metrics;
pub mod resolve;
pub mod rule;
pub mod runner;
pub mod spec;
pub mod validate;

pub use answers::{AnswerSet, AnswerWarning, Meta, conforms};
pub use catalog::{
    Catalog, CatalogDocument, CatalogError, GLOBAL_SELECTOR, tier_selector,
};
pub use compose::{ComposeError, ComposeWarning, ComposedQuestionnaire, Composition, compose};
pub use legacy::{LegacyRuleError, normalize_legacy_rule};
pub use metrics::{Metrics, MetricsSettings, SettingsError, compute_metrics};
pub use resolve::{QuestionStatus, ResolvedState, Section, resolve_active};
pub use rule::{Condition, DependencyRule};
pub use runner::{BriefingPlan, plan_submit_all, plan_submit_patch, prune_stale};
pub use spec::{
    AnswerType, Block, BlockContent, Configuration, HierarchyLevel, QualityTier,
    QuestionDefinition, RespondentType,
};
pub use validate::{AuthoringIssue, evaluation_order, validate_blocks};
