use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{QuizAnswer, QuizResultView, SkinType};
use super::repository::{PageRequest, RepositoryError, SortField, SortOrder};
use super::service::{QuizService, QuizServiceError};
use crate::auth::{authenticate, optional_session, require_role, Sessions};
use crate::directory::{UserId, UserRole};

/// Router builder exposing quiz submission and result listings.
pub fn quiz_router<Q>(service: Arc<QuizService<Q>>, sessions: Sessions) -> Router
where
    Q: super::repository::QuizResultRepository + 'static,
{
    Router::new()
        .route("/api/v1/quiz-results", post(submit_handler::<Q>).get(admin_list_handler::<Q>))
        .route("/api/v1/quiz-results/save", post(submit_handler::<Q>))
        .route("/api/v1/quiz-results/:user_id", get(user_results_handler::<Q>))
        .layer(Extension(sessions))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitQuizRequest {
    pub(crate) answers: Vec<QuizAnswer>,
}

pub(crate) async fn submit_handler<Q>(
    State(service): State<Arc<QuizService<Q>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<SubmitQuizRequest>,
) -> Response
where
    Q: super::repository::QuizResultRepository + 'static,
{
    let user = match optional_session(&headers, sessions.as_ref()) {
        Ok(session) => session.map(|session| session.user_id),
        Err(err) => return err.into_response(),
    };

    match service.submit(user, request.answers) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(err) => quiz_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminListQuery {
    #[serde(default = "default_page")]
    pub(crate) page: usize,
    #[serde(default = "default_limit")]
    pub(crate) limit: usize,
    #[serde(rename = "sortBy", default = "default_sort_by")]
    pub(crate) sort_by: String,
    #[serde(default = "default_order")]
    pub(crate) order: String,
    #[serde(rename = "skinType", default)]
    pub(crate) skin_type: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

fn default_sort_by() -> String {
    "created_at".to_string()
}

fn default_order() -> String {
    "desc".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageView {
    pub(crate) total_results: usize,
    pub(crate) total_pages: usize,
    pub(crate) current_page: usize,
    pub(crate) results: Vec<QuizResultView>,
}

pub(crate) async fn admin_list_handler<Q>(
    State(service): State<Arc<QuizService<Q>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
    Query(query): Query<AdminListQuery>,
) -> Response
where
    Q: super::repository::QuizResultRepository + 'static,
{
    let session = match authenticate(&headers, sessions.as_ref()) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };
    if let Err(err) = require_role(&session, &[UserRole::Admin]) {
        return err.into_response();
    }

    let sort_by = match query.sort_by.as_str() {
        "created_at" | "createdDate" => SortField::CreatedAt,
        "skin_type" | "skinType" => SortField::SkinType,
        other => return validation_response(format!("unknown sort field '{other}'")),
    };
    let order = match query.order.as_str() {
        "asc" => SortOrder::Asc,
        "desc" => SortOrder::Desc,
        other => return validation_response(format!("unknown sort order '{other}'")),
    };
    let skin_type = match query.skin_type.as_deref() {
        None => None,
        Some(raw) => match SkinType::parse(raw) {
            Some(skin_type) => Some(skin_type),
            None => return validation_response(format!("unknown skin type '{raw}'")),
        },
    };

    let request = PageRequest {
        page: query.page,
        limit: query.limit,
        sort_by,
        order,
        skin_type,
    };

    match service.page(request) {
        Ok(page) => {
            let view = PageView {
                total_results: page.total_results,
                total_pages: page.total_pages,
                current_page: page.current_page,
                results: page.results.iter().map(|record| record.view()).collect(),
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => quiz_error_response(err),
    }
}

pub(crate) async fn user_results_handler<Q>(
    State(service): State<Arc<QuizService<Q>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Response
where
    Q: super::repository::QuizResultRepository + 'static,
{
    let session = match authenticate(&headers, sessions.as_ref()) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    let target = UserId(user_id);
    if session.user_id != target && require_role(&session, &[UserRole::Admin]).is_err() {
        return crate::auth::AuthError::Forbidden.into_response();
    }

    match service.results_for_user(&target) {
        Ok(records) => {
            let views: Vec<QuizResultView> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => quiz_error_response(err),
    }
}

fn validation_response(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn quiz_error_response(err: QuizServiceError) -> Response {
    let status = match &err {
        QuizServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QuizServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        QuizServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
