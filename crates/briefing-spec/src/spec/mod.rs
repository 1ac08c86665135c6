pub mod block;
pub mod config;
pub mod question;

pub use block::{Block, BlockContent, HierarchyLevel};
pub use config::{Configuration, QualityTier, RespondentType};
pub use question::{AnswerType, QuestionDefinition};
