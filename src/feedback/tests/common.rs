use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::auth::{Session, SessionStore, Sessions};
use crate::booking::domain::{BookingId, BookingRecord, BookingStatus, TimeSlot};
use crate::booking::repository::{
    BookingRepository, RepositoryError as BookingRepositoryError,
};
use crate::directory::{ServiceId, UserId, UserRole};
use crate::feedback::domain::FeedbackRecord;
use crate::feedback::repository::{FeedbackRepository, RepositoryError};
use crate::feedback::service::{FeedbackService, SubmitFeedbackInput};

#[derive(Default, Clone)]
pub(super) struct MemoryBookings {
    records: Arc<Mutex<Vec<BookingRecord>>>,
}

impl MemoryBookings {
    pub(super) fn with_booking(&self, record: BookingRecord) {
        self.records
            .lock()
            .expect("booking mutex poisoned")
            .push(record);
    }
}

impl BookingRepository for MemoryBookings {
    fn insert(&self, record: BookingRecord) -> Result<BookingRecord, BookingRepositoryError> {
        self.with_booking(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &BookingId) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        let guard = self.records.lock().expect("booking mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn update(&self, record: BookingRecord) -> Result<(), BookingRepositoryError> {
        let mut guard = self.records.lock().expect("booking mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(BookingRepositoryError::NotFound),
        }
    }

    fn list_all(&self) -> Result<Vec<BookingRecord>, BookingRepositoryError> {
        Ok(self.records.lock().expect("booking mutex poisoned").clone())
    }

    fn list_for_customer(
        &self,
        customer: &UserId,
    ) -> Result<Vec<BookingRecord>, BookingRepositoryError> {
        let guard = self.records.lock().expect("booking mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.customer_id == customer)
            .cloned()
            .collect())
    }

    fn assign_consultant(
        &self,
        id: &BookingId,
        consultant: &UserId,
    ) -> Result<BookingRecord, BookingRepositoryError> {
        let mut guard = self.records.lock().expect("booking mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or(BookingRepositoryError::NotFound)?;
        if record.consultant_id.is_some() {
            return Err(BookingRepositoryError::Conflict);
        }
        record.consultant_id = Some(consultant.clone());
        Ok(record.clone())
    }

    fn occupied(
        &self,
        _consultant: &UserId,
        _date: NaiveDate,
        _slot: TimeSlot,
    ) -> Result<bool, BookingRepositoryError> {
        Ok(false)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryFeedback {
    records: Arc<Mutex<Vec<FeedbackRecord>>>,
}

impl FeedbackRepository for MemoryFeedback {
    fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("feedback mutex poisoned");
        if guard
            .iter()
            .any(|existing| existing.booking_id == record.booking_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn find_by_booking(
        &self,
        booking: &BookingId,
    ) -> Result<Option<FeedbackRecord>, RepositoryError> {
        let guard = self.records.lock().expect("feedback mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| &record.booking_id == booking)
            .cloned())
    }

    fn for_service(&self, service: &ServiceId) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        let guard = self.records.lock().expect("feedback mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.service_id == service)
            .cloned()
            .collect())
    }

    fn for_consultant(&self, consultant: &UserId) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        let guard = self.records.lock().expect("feedback mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.consultant_id.as_ref() == Some(consultant))
            .cloned()
            .collect())
    }
}

pub(super) fn booking(id: &str, status: BookingStatus, consultant: Option<&str>) -> BookingRecord {
    BookingRecord {
        id: BookingId(id.to_string()),
        service_id: ServiceId("svc-facial".to_string()),
        customer_id: UserId("user-customer".to_string()),
        consultant_id: consultant.map(|value| UserId(value.to_string())),
        date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        slot: TimeSlot::NineAm,
        status,
        consultant_chosen_by_customer: false,
        created_at: Utc.with_ymd_and_hms(2024, 12, 20, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn submit_input(booking_id: &str) -> SubmitFeedbackInput {
    SubmitFeedbackInput {
        booking_id: booking_id.to_string(),
        service_rating: Some(4),
        service_comment: Some("Lovely facial".to_string()),
        consultant_rating: None,
        consultant_comment: None,
    }
}

pub(super) fn build_service() -> (
    FeedbackService<MemoryBookings, MemoryFeedback>,
    Arc<MemoryBookings>,
    Arc<MemoryFeedback>,
) {
    let bookings = Arc::new(MemoryBookings::default());
    let feedback = Arc::new(MemoryFeedback::default());
    let service = FeedbackService::new(bookings.clone(), feedback.clone());
    (service, bookings, feedback)
}

pub(super) struct StaticSessions(HashMap<String, Session>);

impl SessionStore for StaticSessions {
    fn resolve(&self, token: &str) -> Option<Session> {
        self.0.get(token).cloned()
    }
}

pub(super) fn sessions() -> Sessions {
    let session = Session {
        token: "tok-customer".to_string(),
        user_id: UserId("user-customer".to_string()),
        role: UserRole::Customer,
    };
    Arc::new(StaticSessions(HashMap::from([(
        "tok-customer".to_string(),
        session,
    )])))
}

pub(super) fn auth_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        format!("Bearer {token}").parse().expect("header value"),
    );
    headers
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
