//! Post-completion feedback and recomputed average ratings.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AverageRating, FeedbackId, FeedbackRecord, RatingSubject};
pub use repository::{FeedbackRepository, RepositoryError};
pub use router::feedback_router;
pub use service::{FeedbackService, FeedbackServiceError, FeedbackValidationError, SubmitFeedbackInput};
