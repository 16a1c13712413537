use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use super::domain::{
    BookingId, BookingRecord, BookingStatus, BookingView, RefSummary, TimeSlot, TransitionError,
};
use super::repository::{BookingRepository, RepositoryError};
use crate::directory::repository::consultant;
use crate::directory::{
    ConsultantView, DirectoryError, DirectoryRepository, ServiceId, UserId,
};

static BOOKING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_booking_id() -> BookingId {
    let id = BOOKING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BookingId(format!("bk-{id:06}"))
}

/// Raw create-booking payload before validation.
#[derive(Debug, Clone, Default)]
pub struct CreateBookingInput {
    pub service_id: String,
    pub customer_id: String,
    pub date: String,
    pub time: String,
    pub consultant_id: Option<String>,
}

/// Service composing the booking store, the catalog, and the status graph.
pub struct BookingService<R, D> {
    bookings: Arc<R>,
    directory: Arc<D>,
}

impl<R, D> BookingService<R, D>
where
    R: BookingRepository + 'static,
    D: DirectoryRepository + 'static,
{
    pub fn new(bookings: Arc<R>, directory: Arc<D>) -> Self {
        Self {
            bookings,
            directory,
        }
    }

    /// Create a booking in status Pending. The consultant-chosen flag is set
    /// exactly when the customer supplied a consultant id.
    pub fn create(&self, input: CreateBookingInput) -> Result<BookingRecord, BookingServiceError> {
        let service_id = required(&input.service_id, "service")?;
        let customer_id = required(&input.customer_id, "customer")?;
        let date_raw = required(&input.date, "date")?;
        let time_raw = required(&input.time, "time")?;

        let date = parse_date(&date_raw)?;
        let slot = TimeSlot::parse(&time_raw)
            .ok_or(BookingValidationError::UnknownTimeSlot(time_raw))?;

        let service_id = ServiceId(service_id);
        if self.directory.service(&service_id)?.is_none() {
            return Err(BookingServiceError::UnknownService(service_id));
        }

        let customer_id = UserId(customer_id);
        if self.directory.user(&customer_id)?.is_none() {
            return Err(BookingServiceError::UnknownCustomer(customer_id));
        }

        let consultant_id = match input.consultant_id.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                let id = UserId(raw.trim().to_string());
                if consultant(self.directory.as_ref(), &id)?.is_none() {
                    return Err(BookingServiceError::UnknownConsultant(id));
                }
                Some(id)
            }
            _ => None,
        };

        let record = BookingRecord {
            id: next_booking_id(),
            service_id,
            customer_id,
            consultant_chosen_by_customer: consultant_id.is_some(),
            consultant_id,
            date,
            slot,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };

        let stored = self.bookings.insert(record)?;
        Ok(stored)
    }

    pub fn get(&self, id: &BookingId) -> Result<BookingRecord, BookingServiceError> {
        let record = self
            .bookings
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Cancel a booking. Repeat cancellation is an idempotent no-op because
    /// the transition graph admits Cancelled->Cancelled.
    pub fn cancel(&self, id: &BookingId) -> Result<BookingRecord, BookingServiceError> {
        self.update_status(id, BookingStatus::Cancelled)
    }

    /// Move a booking through the status graph; anything outside the allowed
    /// transitions is rejected without touching the record.
    pub fn update_status(
        &self,
        id: &BookingId,
        next: BookingStatus,
    ) -> Result<BookingRecord, BookingServiceError> {
        let mut record = self
            .bookings
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        record.transition_to(next)?;
        self.bookings.update(record.clone())?;
        Ok(record)
    }

    /// All bookings, expanded for display, in insertion order.
    pub fn list_all(&self) -> Result<Vec<BookingView>, BookingServiceError> {
        let records = self.bookings.list_all()?;
        records
            .into_iter()
            .map(|record| self.expand(record))
            .collect()
    }

    /// One customer's bookings, expanded for display.
    pub fn list_for_customer(
        &self,
        customer: &UserId,
    ) -> Result<Vec<BookingView>, BookingServiceError> {
        let records = self.bookings.list_for_customer(customer)?;
        records
            .into_iter()
            .map(|record| self.expand(record))
            .collect()
    }

    /// Verified consultants free on the booking's date and slot. A
    /// consultant is free when no non-cancelled booking of theirs occupies
    /// that slot.
    pub fn available_consultants(
        &self,
        booking_id: &BookingId,
    ) -> Result<Vec<ConsultantView>, BookingServiceError> {
        let booking = self.get(booking_id)?;

        let mut available = Vec::new();
        for candidate in self.directory.consultants()? {
            if !candidate.verified {
                continue;
            }
            if self
                .bookings
                .occupied(&candidate.id, booking.date, booking.slot)?
            {
                continue;
            }
            available.push(ConsultantView::from(candidate));
        }
        Ok(available)
    }

    /// Bind a consultant to an unassigned booking. The write is conditional:
    /// a booking that already carries a consultant is left untouched and the
    /// call fails with a conflict. Status is not changed.
    pub fn assign(
        &self,
        booking_id: &BookingId,
        consultant_id: &UserId,
    ) -> Result<BookingRecord, BookingServiceError> {
        if consultant(self.directory.as_ref(), consultant_id)?.is_none() {
            return Err(BookingServiceError::UnknownConsultant(consultant_id.clone()));
        }

        let record = self.bookings.assign_consultant(booking_id, consultant_id)?;
        Ok(record)
    }

    fn expand(&self, record: BookingRecord) -> Result<BookingView, BookingServiceError> {
        let service = self.directory.service(&record.service_id)?;
        let service_summary = RefSummary {
            id: record.service_id.0.clone(),
            name: service
                .map(|record| record.name)
                .unwrap_or_else(|| record.service_id.0.clone()),
        };

        let consultant_summary = match &record.consultant_id {
            Some(id) => {
                let name = self
                    .directory
                    .user(id)?
                    .map(|user| user.full_name())
                    .unwrap_or_else(|| id.0.clone());
                Some(RefSummary {
                    id: id.0.clone(),
                    name,
                })
            }
            None => None,
        };

        Ok(BookingView {
            id: record.id,
            service: service_summary,
            customer_id: record.customer_id,
            consultant: consultant_summary,
            date: record.date,
            time: record.slot.label(),
            status: record.status.label(),
            consultant_chosen_by_customer: record.consultant_chosen_by_customer,
            created_at: record.created_at,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, BookingValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookingValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate, BookingValidationError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| BookingValidationError::InvalidDate(raw.to_string()))
}

/// Input validation failures for booking creation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookingValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("date '{0}' is not a YYYY-MM-DD calendar date")]
    InvalidDate(String),
    #[error("unknown time slot '{0}'")]
    UnknownTimeSlot(String),
}

/// Error raised by the booking service.
#[derive(Debug, thiserror::Error)]
pub enum BookingServiceError {
    #[error(transparent)]
    Validation(#[from] BookingValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("service {0} not found")]
    UnknownService(ServiceId),
    #[error("customer {0} not found")]
    UnknownCustomer(UserId),
    #[error("consultant {0} not found")]
    UnknownConsultant(UserId),
}
