use serde::{Deserialize, Serialize};

use super::domain::{QuizResultRecord, SkinType};
use crate::directory::UserId;

/// Storage abstraction for quiz results.
pub trait QuizResultRepository: Send + Sync {
    fn insert(&self, record: QuizResultRecord) -> Result<QuizResultRecord, RepositoryError>;
    /// A user's own results, newest first.
    fn list_for_user(&self, user: &UserId) -> Result<Vec<QuizResultRecord>, RepositoryError>;
    /// Admin listing with filtering, sorting, and pagination.
    fn page(&self, request: &PageRequest) -> Result<Page, RepositoryError>;
}

/// Error enumeration for quiz-result storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    CreatedAt,
    SkinType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Admin listing request. `page` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub skin_type: Option<SkinType>,
}

/// One page of results plus the pagination envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub total_results: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub results: Vec<QuizResultRecord>,
}

/// Shared filter/sort/slice implementation for in-memory adapters.
pub fn paginate(mut records: Vec<QuizResultRecord>, request: &PageRequest) -> Page {
    if let Some(filter) = request.skin_type {
        records.retain(|record| record.skin_type == filter);
    }

    records.sort_by(|a, b| {
        let ordering = match request.sort_by {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::SkinType => a.skin_type.label().cmp(b.skin_type.label()),
        };
        match request.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let total_results = records.len();
    let total_pages = total_results.div_ceil(request.limit.max(1));
    let start = request.page.saturating_sub(1) * request.limit;
    let results: Vec<QuizResultRecord> = records
        .into_iter()
        .skip(start)
        .take(request.limit)
        .collect();

    Page {
        total_results,
        total_pages,
        current_page: request.page,
        results,
    }
}
