use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{AverageRating, FeedbackId, FeedbackRecord, RatingSubject};
use super::repository::{FeedbackRepository, RepositoryError};
use crate::booking::repository::{
    BookingRepository, RepositoryError as BookingRepositoryError,
};
use crate::booking::{BookingId, BookingStatus};
use crate::directory::{ServiceId, UserId};

const MIN_RATING: u8 = 1;
const MAX_RATING: u8 = 5;

static FEEDBACK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_feedback_id() -> FeedbackId {
    let id = FEEDBACK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    FeedbackId(format!("fb-{id:06}"))
}

/// Raw feedback submission before validation.
#[derive(Debug, Clone, Default)]
pub struct SubmitFeedbackInput {
    pub booking_id: String,
    pub service_rating: Option<u8>,
    pub service_comment: Option<String>,
    pub consultant_rating: Option<u8>,
    pub consultant_comment: Option<String>,
}

/// Service guarding feedback creation and computing averages on demand.
pub struct FeedbackService<B, F> {
    bookings: Arc<B>,
    feedback: Arc<F>,
}

impl<B, F> FeedbackService<B, F>
where
    B: BookingRepository + 'static,
    F: FeedbackRepository + 'static,
{
    pub fn new(bookings: Arc<B>, feedback: Arc<F>) -> Self {
        Self { bookings, feedback }
    }

    /// Accept feedback for a completed booking, denormalizing the service
    /// and consultant references from the booking record.
    pub fn submit(
        &self,
        input: SubmitFeedbackInput,
    ) -> Result<FeedbackRecord, FeedbackServiceError> {
        let booking_id = input.booking_id.trim();
        if booking_id.is_empty() {
            return Err(FeedbackValidationError::MissingBooking.into());
        }

        if input.service_rating.is_none() && input.consultant_rating.is_none() {
            return Err(FeedbackValidationError::NoRatingSupplied.into());
        }
        for rating in [input.service_rating, input.consultant_rating]
            .into_iter()
            .flatten()
        {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(FeedbackValidationError::RatingOutOfRange { rating }.into());
            }
        }

        let booking_id = BookingId(booking_id.to_string());
        let booking = self
            .bookings
            .fetch(&booking_id)?
            .ok_or(BookingRepositoryError::NotFound)?;

        if booking.status != BookingStatus::Completed {
            return Err(FeedbackServiceError::BookingNotCompleted {
                status: booking.status,
            });
        }

        let record = FeedbackRecord {
            id: next_feedback_id(),
            booking_id,
            service_id: booking.service_id,
            consultant_id: booking.consultant_id,
            service_rating: input.service_rating,
            service_comment: input.service_comment.unwrap_or_default(),
            consultant_rating: input.consultant_rating,
            consultant_comment: input.consultant_comment.unwrap_or_default(),
            created_at: Utc::now(),
        };

        let stored = self.feedback.insert(record)?;
        Ok(stored)
    }

    /// Mean rating for a service or consultant, recomputed from the stored
    /// feedback on every call.
    pub fn average(
        &self,
        subject: RatingSubject,
        entity_id: &str,
    ) -> Result<AverageRating, FeedbackServiceError> {
        let ratings: Vec<u8> = match subject {
            RatingSubject::Service => self
                .feedback
                .for_service(&ServiceId(entity_id.to_string()))?
                .into_iter()
                .filter_map(|record| record.service_rating)
                .collect(),
            RatingSubject::Consultant => self
                .feedback
                .for_consultant(&UserId(entity_id.to_string()))?
                .into_iter()
                .filter_map(|record| record.consultant_rating)
                .collect(),
        };

        Ok(AverageRating::of(&ratings))
    }

    pub fn by_booking(
        &self,
        booking: &BookingId,
    ) -> Result<Option<FeedbackRecord>, FeedbackServiceError> {
        Ok(self.feedback.find_by_booking(booking)?)
    }
}

/// Input validation failures for feedback submissions.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeedbackValidationError {
    #[error("booking reference is required")]
    MissingBooking,
    #[error("at least one rating is required")]
    NoRatingSupplied,
    #[error("rating {rating} outside the 1-5 range")]
    RatingOutOfRange { rating: u8 },
}

/// Error raised by the feedback service.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackServiceError {
    #[error(transparent)]
    Validation(#[from] FeedbackValidationError),
    #[error("only completed bookings can receive feedback (status {status})")]
    BookingNotCompleted { status: BookingStatus },
    #[error(transparent)]
    Booking(#[from] BookingRepositoryError),
    #[error(transparent)]
    Feedback(#[from] RepositoryError),
}
