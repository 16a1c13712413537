//! Booking lifecycle and consultant assignment.
//!
//! A booking request is created Pending by a customer, moved through an
//! enforced status graph by staff, and optionally bound to a consultant via a
//! conditional (assign-if-unassigned) update.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BookingId, BookingRecord, BookingStatus, BookingView, RefSummary, TimeSlot, TransitionError,
};
pub use repository::{BookingRepository, RepositoryError};
pub use router::booking_router;
pub use service::{BookingService, BookingServiceError, BookingValidationError, CreateBookingInput};
