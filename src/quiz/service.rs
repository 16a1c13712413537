use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{QuizAnswer, QuizResultId, QuizResultRecord};
use super::repository::{Page, PageRequest, QuizResultRepository, RepositoryError};
use super::scoring::score_answers;
use crate::directory::UserId;

const MIN_ANSWER_WEIGHT: u8 = 1;
const MAX_ANSWER_WEIGHT: u8 = 4;

static QUIZ_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_quiz_result_id() -> QuizResultId {
    let id = QUIZ_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    QuizResultId(format!("quiz-{id:06}"))
}

/// Service owning quiz submission and result listings.
pub struct QuizService<Q> {
    results: Arc<Q>,
}

impl<Q> QuizService<Q>
where
    Q: QuizResultRepository + 'static,
{
    pub fn new(results: Arc<Q>) -> Self {
        Self { results }
    }

    /// Score a submission and persist the result. Anonymous submissions are
    /// stored without a user reference.
    pub fn submit(
        &self,
        user: Option<UserId>,
        answers: Vec<QuizAnswer>,
    ) -> Result<QuizResultRecord, QuizServiceError> {
        if let Some(answer) = answers
            .iter()
            .find(|answer| answer.weight < MIN_ANSWER_WEIGHT || answer.weight > MAX_ANSWER_WEIGHT)
        {
            return Err(QuizValidationError::WeightOutOfRange {
                weight: answer.weight,
            }
            .into());
        }

        let Some(skin_type) = score_answers(&answers) else {
            return Err(QuizValidationError::EmptyAnswers.into());
        };

        let record = QuizResultRecord {
            id: next_quiz_result_id(),
            user_id: user,
            answers,
            skin_type,
            created_at: Utc::now(),
        };

        let stored = self.results.insert(record)?;
        Ok(stored)
    }

    /// A user's own results, newest first.
    pub fn results_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<QuizResultRecord>, QuizServiceError> {
        Ok(self.results.list_for_user(user)?)
    }

    /// Admin listing. Pagination parameters are validated here so adapters
    /// never see a zero page or limit.
    pub fn page(&self, request: PageRequest) -> Result<Page, QuizServiceError> {
        if request.page < 1 || request.limit < 1 {
            return Err(QuizValidationError::InvalidPagination.into());
        }
        Ok(self.results.page(&request)?)
    }
}

/// Input validation failures for quiz submissions and listings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizValidationError {
    #[error("answers are required")]
    EmptyAnswers,
    #[error("answer weight {weight} outside the 1-4 range")]
    WeightOutOfRange { weight: u8 },
    #[error("page and limit must be positive")]
    InvalidPagination,
}

/// Error raised by the quiz service.
#[derive(Debug, thiserror::Error)]
pub enum QuizServiceError {
    #[error(transparent)]
    Validation(#[from] QuizValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
