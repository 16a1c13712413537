use super::domain::FeedbackRecord;
use crate::booking::BookingId;
use crate::directory::{ServiceId, UserId};

/// Storage abstraction for feedback records.
pub trait FeedbackRepository: Send + Sync {
    /// Persist a new record. A booking accepts exactly one feedback record;
    /// repeats fail with `Conflict`.
    fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError>;
    fn find_by_booking(&self, booking: &BookingId)
        -> Result<Option<FeedbackRecord>, RepositoryError>;
    fn for_service(&self, service: &ServiceId) -> Result<Vec<FeedbackRecord>, RepositoryError>;
    fn for_consultant(&self, consultant: &UserId) -> Result<Vec<FeedbackRecord>, RepositoryError>;
}

/// Error enumeration for feedback storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("feedback already submitted for this booking")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
