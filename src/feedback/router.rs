use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::RatingSubject;
use super::repository::{FeedbackRepository, RepositoryError};
use super::service::{FeedbackService, FeedbackServiceError, SubmitFeedbackInput};
use crate::auth::{authenticate, Sessions};
use crate::booking::repository::{
    BookingRepository, RepositoryError as BookingRepositoryError,
};
use crate::booking::BookingId;

/// Router builder exposing feedback submission and rating lookups.
pub fn feedback_router<B, F>(service: Arc<FeedbackService<B, F>>, sessions: Sessions) -> Router
where
    B: BookingRepository + 'static,
    F: FeedbackRepository + 'static,
{
    Router::new()
        .route("/api/v1/feedback", post(submit_handler::<B, F>))
        .route(
            "/api/v1/feedback/average-rating/:subject/:entity_id",
            get(average_handler::<B, F>),
        )
        .route(
            "/api/v1/feedback/booking/:booking_id",
            get(by_booking_handler::<B, F>),
        )
        .layer(Extension(sessions))
        .with_state(service)
}

/// Submission payload; field spellings follow the platform's existing
/// clients.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitFeedbackRequest {
    pub(crate) booking_request_id: String,
    #[serde(default)]
    pub(crate) service_rating: Option<u8>,
    #[serde(default)]
    pub(crate) service_comment: Option<String>,
    #[serde(default)]
    pub(crate) consultant_rating: Option<u8>,
    #[serde(default)]
    pub(crate) consultant_comment: Option<String>,
}

pub(crate) async fn submit_handler<B, F>(
    State(service): State<Arc<FeedbackService<B, F>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<SubmitFeedbackRequest>,
) -> Response
where
    B: BookingRepository + 'static,
    F: FeedbackRepository + 'static,
{
    if let Err(err) = authenticate(&headers, sessions.as_ref()) {
        return err.into_response();
    }

    let input = SubmitFeedbackInput {
        booking_id: request.booking_request_id,
        service_rating: request.service_rating,
        service_comment: request.service_comment,
        consultant_rating: request.consultant_rating,
        consultant_comment: request.consultant_comment,
    };

    match service.submit(input) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => feedback_error_response(err),
    }
}

pub(crate) async fn average_handler<B, F>(
    State(service): State<Arc<FeedbackService<B, F>>>,
    Path((subject, entity_id)): Path<(String, String)>,
) -> Response
where
    B: BookingRepository + 'static,
    F: FeedbackRepository + 'static,
{
    let Some(subject) = RatingSubject::parse(&subject) else {
        let payload = json!({ "error": format!("unknown rating subject '{subject}'") });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    match service.average(subject, &entity_id) {
        Ok(average) => (StatusCode::OK, axum::Json(average)).into_response(),
        Err(err) => feedback_error_response(err),
    }
}

pub(crate) async fn by_booking_handler<B, F>(
    State(service): State<Arc<FeedbackService<B, F>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    B: BookingRepository + 'static,
    F: FeedbackRepository + 'static,
{
    match service.by_booking(&BookingId(booking_id)) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        // Explicit placeholder rather than a 404, so detail pages can render
        // an empty state without special-casing errors.
        Ok(None) => {
            let payload = json!({
                "serviceRating": serde_json::Value::Null,
                "serviceComment": "No feedback yet",
                "consultantRating": serde_json::Value::Null,
                "consultantComment": "No feedback yet",
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => feedback_error_response(err),
    }
}

fn feedback_error_response(err: FeedbackServiceError) -> Response {
    let status = match &err {
        FeedbackServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FeedbackServiceError::BookingNotCompleted { .. } => StatusCode::CONFLICT,
        FeedbackServiceError::Booking(BookingRepositoryError::NotFound) => StatusCode::NOT_FOUND,
        FeedbackServiceError::Feedback(RepositoryError::Conflict) => StatusCode::CONFLICT,
        FeedbackServiceError::Booking(_) | FeedbackServiceError::Feedback(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
