use chrono::NaiveDate;

use super::domain::{BookingId, BookingRecord, TimeSlot};
use crate::directory::UserId;

/// Storage abstraction for booking requests.
pub trait BookingRepository: Send + Sync {
    fn insert(&self, record: BookingRecord) -> Result<BookingRecord, RepositoryError>;
    fn fetch(&self, id: &BookingId) -> Result<Option<BookingRecord>, RepositoryError>;
    fn update(&self, record: BookingRecord) -> Result<(), RepositoryError>;
    /// All bookings in insertion order.
    fn list_all(&self) -> Result<Vec<BookingRecord>, RepositoryError>;
    fn list_for_customer(&self, customer: &UserId) -> Result<Vec<BookingRecord>, RepositoryError>;
    /// Conditional update: writes the consultant reference only when the
    /// booking currently has none. Fails with `Conflict` otherwise, so two
    /// concurrent assignments cannot silently overwrite each other.
    fn assign_consultant(
        &self,
        id: &BookingId,
        consultant: &UserId,
    ) -> Result<BookingRecord, RepositoryError>;
    /// True when a non-cancelled booking already holds the same date and
    /// slot for this consultant.
    fn occupied(
        &self,
        consultant: &UserId,
        date: NaiveDate,
        slot: TimeSlot,
    ) -> Result<bool, RepositoryError>;
}

/// Error enumeration for booking storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("booking not found")]
    NotFound,
    #[error("conflicting update")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
