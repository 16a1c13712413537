use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::auth::{Session, SessionStore, Sessions};
use crate::booking::domain::{BookingId, BookingRecord, BookingStatus, TimeSlot};
use crate::booking::repository::{BookingRepository, RepositoryError};
use crate::booking::service::{BookingService, CreateBookingInput};
use crate::directory::{
    DirectoryError, DirectoryRepository, ServiceId, ServiceRecord, UserId, UserRecord, UserRole,
};

#[derive(Default, Clone)]
pub(super) struct MemoryBookings {
    records: Arc<Mutex<Vec<BookingRecord>>>,
}

impl BookingRepository for MemoryBookings {
    fn insert(&self, record: BookingRecord) -> Result<BookingRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("booking mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &BookingId) -> Result<Option<BookingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("booking mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn update(&self, record: BookingRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("booking mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn list_all(&self) -> Result<Vec<BookingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("booking mutex poisoned");
        Ok(guard.clone())
    }

    fn list_for_customer(&self, customer: &UserId) -> Result<Vec<BookingRecord>, RepositoryError> {
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
    ) -> Result<BookingRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("booking mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if record.consultant_id.is_some() {
            return Err(RepositoryError::Conflict);
        }
        record.consultant_id = Some(consultant.clone());
        Ok(record.clone())
    }

    fn occupied(
        &self,
        consultant: &UserId,
        date: NaiveDate,
        slot: TimeSlot,
    ) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("booking mutex poisoned");
        Ok(guard.iter().any(|record| {
            record.consultant_id.as_ref() == Some(consultant)
                && record.date == date
                && record.slot == slot
                && record.status != BookingStatus::Cancelled
        }))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    services: Vec<ServiceRecord>,
    users: Vec<UserRecord>,
}

impl MemoryDirectory {
    pub(super) fn seeded() -> Self {
        let services = vec![
            ServiceRecord {
                id: ServiceId("svc-facial".to_string()),
                name: "Signature Facial".to_string(),
                price: 4500,
            },
            ServiceRecord {
                id: ServiceId("svc-peel".to_string()),
                name: "Enzyme Peel".to_string(),
                price: 6000,
            },
        ];
        let users = vec![
            user("user-customer", "An", "Nguyen", UserRole::Customer, true),
            user("user-other", "Binh", "Le", UserRole::Customer, true),
            user("user-staff", "Chi", "Hoang", UserRole::Staff, true),
            user("user-admin", "Dao", "Vu", UserRole::Admin, true),
            user("cons-lan", "Lan", "Pham", UserRole::Consultant, true),
            user("cons-mai", "Mai", "Tran", UserRole::Consultant, true),
            user("cons-new", "Ngoc", "Dang", UserRole::Consultant, false),
        ];
        Self { services, users }
    }
}

fn user(id: &str, first: &str, last: &str, role: UserRole, verified: bool) -> UserRecord {
    UserRecord {
        id: UserId(id.to_string()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        role,
        verified,
    }
}

impl DirectoryRepository for MemoryDirectory {
    fn service(&self, id: &ServiceId) -> Result<Option<ServiceRecord>, DirectoryError> {
        Ok(self.services.iter().find(|record| &record.id == id).cloned())
    }

    fn services(&self) -> Result<Vec<ServiceRecord>, DirectoryError> {
        Ok(self.services.clone())
    }

    fn user(&self, id: &UserId) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.users.iter().find(|record| &record.id == id).cloned())
    }

    fn consultants(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        Ok(self
            .users
            .iter()
            .filter(|record| record.role == UserRole::Consultant)
            .cloned()
            .collect())
    }
}

pub(super) fn build_service() -> (
    BookingService<MemoryBookings, MemoryDirectory>,
    Arc<MemoryBookings>,
    Arc<MemoryDirectory>,
) {
    let bookings = Arc::new(MemoryBookings::default());
    let directory = Arc::new(MemoryDirectory::seeded());
    let service = BookingService::new(bookings.clone(), directory.clone());
    (service, bookings, directory)
}

pub(super) fn create_input() -> CreateBookingInput {
    CreateBookingInput {
        service_id: "svc-facial".to_string(),
        customer_id: "user-customer".to_string(),
        date: "2025-01-01".to_string(),
        time: "09:00 AM".to_string(),
        consultant_id: None,
    }
}

pub(super) struct StaticSessions(HashMap<String, Session>);

impl SessionStore for StaticSessions {
    fn resolve(&self, token: &str) -> Option<Session> {
        self.0.get(token).cloned()
    }
}

pub(super) fn sessions() -> Sessions {
    let entries = [
        ("tok-customer", "user-customer", UserRole::Customer),
        ("tok-other", "user-other", UserRole::Customer),
        ("tok-staff", "user-staff", UserRole::Staff),
        ("tok-admin", "user-admin", UserRole::Admin),
    ];
    let map = entries
        .into_iter()
        .map(|(token, user_id, role)| {
            (
                token.to_string(),
                Session {
                    token: token.to_string(),
                    user_id: UserId(user_id.to_string()),
                    role,
                },
            )
        })
        .collect();
    Arc::new(StaticSessions(map))
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
