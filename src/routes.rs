use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use dermabook::auth::Sessions;
use dermabook::booking::{booking_router, BookingRepository, BookingService};
use dermabook::directory::{directory_router, DirectoryRepository};
use dermabook::feedback::{feedback_router, FeedbackRepository, FeedbackService};
use dermabook::quiz::{quiz_router, QuizResultRepository, QuizService};

use crate::infra::AppState;

/// Compose the domain routers with the operational endpoints.
pub(crate) fn api_router<R, D, Q, F>(
    bookings: Arc<BookingService<R, D>>,
    quiz: Arc<QuizService<Q>>,
    feedback: Arc<FeedbackService<R, F>>,
    directory: Arc<D>,
    sessions: Sessions,
) -> axum::Router
where
    R: BookingRepository + 'static,
    D: DirectoryRepository + 'static,
    Q: QuizResultRepository + 'static,
    F: FeedbackRepository + 'static,
{
    booking_router(bookings, sessions.clone())
        .merge(quiz_router(quiz, sessions.clone()))
        .merge(feedback_router(feedback, sessions))
        .merge(directory_router(directory))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
