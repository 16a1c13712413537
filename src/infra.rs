use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use dermabook::auth::{Session, SessionStore};
use dermabook::booking::{
    BookingId, BookingRecord, BookingRepository, BookingStatus,
    RepositoryError as BookingRepositoryError, TimeSlot,
};
use dermabook::directory::{
    DirectoryError, DirectoryRepository, ServiceId, ServiceRecord, UserId, UserRecord, UserRole,
};
use dermabook::feedback::{
    FeedbackRecord, FeedbackRepository, RepositoryError as FeedbackRepositoryError,
};
use dermabook::quiz::{
    Page, PageRequest, QuizResultRecord, QuizResultRepository,
    RepositoryError as QuizRepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryBookingRepository {
    records: Arc<Mutex<Vec<BookingRecord>>>,
}

impl BookingRepository for InMemoryBookingRepository {
    fn insert(&self, record: BookingRecord) -> Result<BookingRecord, BookingRepositoryError> {
        let mut guard = self.records.lock().expect("booking mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(BookingRepositoryError::Conflict);
        }
        guard.push(record.clone());
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
        consultant: &UserId,
        date: NaiveDate,
        slot: TimeSlot,
    ) -> Result<bool, BookingRepositoryError> {
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
pub(crate) struct InMemoryQuizResultRepository {
    records: Arc<Mutex<Vec<QuizResultRecord>>>,
}

impl QuizResultRepository for InMemoryQuizResultRepository {
    fn insert(&self, record: QuizResultRecord) -> Result<QuizResultRecord, QuizRepositoryError> {
        let mut guard = self.records.lock().expect("quiz mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(QuizRepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn list_for_user(&self, user: &UserId) -> Result<Vec<QuizResultRecord>, QuizRepositoryError> {
        let guard = self.records.lock().expect("quiz mutex poisoned");
        let mut matching: Vec<QuizResultRecord> = guard
            .iter()
            .filter(|record| record.user_id.as_ref() == Some(user))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    fn page(&self, request: &PageRequest) -> Result<Page, QuizRepositoryError> {
        let guard = self.records.lock().expect("quiz mutex poisoned");
        Ok(dermabook::quiz::repository::paginate(guard.clone(), request))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFeedbackRepository {
    records: Arc<Mutex<Vec<FeedbackRecord>>>,
}

impl FeedbackRepository for InMemoryFeedbackRepository {
    fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, FeedbackRepositoryError> {
        let mut guard = self.records.lock().expect("feedback mutex poisoned");
        if guard
            .iter()
            .any(|existing| existing.booking_id == record.booking_id)
        {
            return Err(FeedbackRepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn find_by_booking(
        &self,
        booking: &BookingId,
    ) -> Result<Option<FeedbackRecord>, FeedbackRepositoryError> {
        let guard = self.records.lock().expect("feedback mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| &record.booking_id == booking)
            .cloned())
    }

    fn for_service(
        &self,
        service: &ServiceId,
    ) -> Result<Vec<FeedbackRecord>, FeedbackRepositoryError> {
        let guard = self.records.lock().expect("feedback mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.service_id == service)
            .cloned()
            .collect())
    }

    fn for_consultant(
        &self,
        consultant: &UserId,
    ) -> Result<Vec<FeedbackRecord>, FeedbackRepositoryError> {
        let guard = self.records.lock().expect("feedback mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.consultant_id.as_ref() == Some(consultant))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDirectory {
    services: Vec<ServiceRecord>,
    users: Vec<UserRecord>,
}

impl DirectoryRepository for InMemoryDirectory {
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

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl InMemorySessionStore {
    pub(crate) fn issue(&self, token: &str, user: &UserRecord) {
        let session = Session {
            token: token.to_string(),
            user_id: user.id.clone(),
            role: user.role,
        };
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(token.to_string(), session);
    }
}

impl SessionStore for InMemorySessionStore {
    fn resolve(&self, token: &str) -> Option<Session> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .get(token)
            .cloned()
    }
}

/// Demo catalog used until the service is wired to a real user store:
/// a small set of services and accounts, each account with a fixed token.
pub(crate) fn seed_directory() -> InMemoryDirectory {
    let services = vec![
        service("svc-signature-facial", "Signature Facial", 4500),
        service("svc-hydra-boost", "Hydra Boost Therapy", 6500),
        service("svc-enzyme-peel", "Enzyme Peel", 6000),
        service("svc-acne-program", "Acne Care Program", 8000),
    ];
    let users = vec![
        user("user-an", "An", "Nguyen", UserRole::Customer, true),
        user("user-binh", "Binh", "Le", UserRole::Customer, true),
        user("staff-chi", "Chi", "Hoang", UserRole::Staff, true),
        user("manager-duc", "Duc", "Pham", UserRole::Manager, true),
        user("admin-dao", "Dao", "Vu", UserRole::Admin, true),
        user("cons-lan", "Lan", "Pham", UserRole::Consultant, true),
        user("cons-mai", "Mai", "Tran", UserRole::Consultant, true),
        user("cons-ngoc", "Ngoc", "Dang", UserRole::Consultant, false),
    ];
    InMemoryDirectory { services, users }
}

/// One fixed bearer token per seeded account (`demo-<account id>`).
pub(crate) fn seed_sessions(directory: &InMemoryDirectory) -> InMemorySessionStore {
    let store = InMemorySessionStore::default();
    for account in &directory.users {
        store.issue(&format!("demo-{}", account.id.0), account);
    }
    store
}

fn service(id: &str, name: &str, price: u32) -> ServiceRecord {
    ServiceRecord {
        id: ServiceId(id.to_string()),
        name: name.to_string(),
        price,
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

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_slot(raw: &str) -> Result<TimeSlot, String> {
    TimeSlot::parse(raw).ok_or_else(|| {
        format!(
            "unknown time slot '{raw}' (expected one of {})",
            TimeSlot::ALL.map(TimeSlot::label).join(", ")
        )
    })
}
