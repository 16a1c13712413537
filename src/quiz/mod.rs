//! Skin-type quiz: weighted-answer scoring and immutable result records.

pub mod domain;
pub mod repository;
pub mod router;
pub(crate) mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{QuizAnswer, QuizResultId, QuizResultRecord, QuizResultView, SkinType};
pub use repository::{
    Page, PageRequest, QuizResultRepository, RepositoryError, SortField, SortOrder,
};
pub use router::quiz_router;
pub use service::{QuizService, QuizServiceError, QuizValidationError};
