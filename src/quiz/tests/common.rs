use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::auth::{Session, SessionStore, Sessions};
use crate::directory::{UserId, UserRole};
use crate::quiz::domain::{QuizAnswer, QuizResultId, QuizResultRecord, SkinType};
use crate::quiz::repository::{paginate, PageRequest, QuizResultRepository, RepositoryError};
use crate::quiz::service::QuizService;

pub(super) fn answers(weights: &[u8]) -> Vec<QuizAnswer> {
    weights
        .iter()
        .enumerate()
        .map(|(index, weight)| QuizAnswer {
            question_id: format!("q-{index}"),
            weight: *weight,
            answer_text: format!("option {weight}"),
        })
        .collect()
}

pub(super) fn stamped(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn stored_result(
    id: &str,
    user: Option<&str>,
    skin_type: SkinType,
    created_at: DateTime<Utc>,
) -> QuizResultRecord {
    QuizResultRecord {
        id: QuizResultId(id.to_string()),
        user_id: user.map(|value| UserId(value.to_string())),
        answers: answers(&[2, 3]),
        skin_type,
        created_at,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryQuizResults {
    records: Arc<Mutex<Vec<QuizResultRecord>>>,
}

impl QuizResultRepository for MemoryQuizResults {
    fn insert(&self, record: QuizResultRecord) -> Result<QuizResultRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn list_for_user(&self, user: &UserId) -> Result<Vec<QuizResultRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut matching: Vec<QuizResultRecord> = guard
            .iter()
            .filter(|record| record.user_id.as_ref() == Some(user))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    fn page(&self, request: &PageRequest) -> Result<crate::quiz::repository::Page, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(paginate(guard.clone(), request))
    }
}

pub(super) fn build_service() -> (QuizService<MemoryQuizResults>, Arc<MemoryQuizResults>) {
    let repository = Arc::new(MemoryQuizResults::default());
    let service = QuizService::new(repository.clone());
    (service, repository)
}

pub(super) struct StaticSessions(HashMap<String, Session>);

impl SessionStore for StaticSessions {
    fn resolve(&self, token: &str) -> Option<Session> {
        self.0.get(token).cloned()
    }
}

pub(super) fn sessions() -> Sessions {
    let mut map = HashMap::new();
    map.insert(
        "tok-admin".to_string(),
        Session {
            token: "tok-admin".to_string(),
            user_id: UserId("user-admin".to_string()),
            role: UserRole::Admin,
        },
    );
    map.insert(
        "tok-customer".to_string(),
        Session {
            token: "tok-customer".to_string(),
            user_id: UserId("user-customer".to_string()),
            role: UserRole::Customer,
        },
    );
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
