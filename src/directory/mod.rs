//! Read-only catalog of services and platform users.
//!
//! The booking core references services and consultants by id but never owns
//! them; the only write-back onto this data is the consultant reference that
//! `booking` stores on a booking record.

pub mod domain;
pub mod repository;
pub mod router;

pub use domain::{ConsultantView, ServiceId, ServiceRecord, ServiceView, UserId, UserRecord, UserRole};
pub use repository::{DirectoryError, DirectoryRepository};
pub use router::directory_router;
