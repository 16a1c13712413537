use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::{ConsultantView, ServiceId, ServiceView, UserId};
use super::repository::{consultant, DirectoryRepository};

/// Router builder exposing the public catalog endpoints.
pub fn directory_router<D>(directory: Arc<D>) -> Router
where
    D: DirectoryRepository + 'static,
{
    Router::new()
        .route("/api/v1/services", get(list_services::<D>))
        .route("/api/v1/services/:service_id", get(get_service::<D>))
        .route("/api/v1/consultants", get(list_consultants::<D>))
        .route("/api/v1/consultants/:consultant_id", get(get_consultant::<D>))
        .with_state(directory)
}

pub(crate) async fn list_services<D>(State(directory): State<Arc<D>>) -> Response
where
    D: DirectoryRepository + 'static,
{
    match directory.services() {
        Ok(services) => {
            let views: Vec<ServiceView> = services.into_iter().map(ServiceView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => unavailable(err),
    }
}

pub(crate) async fn get_service<D>(
    State(directory): State<Arc<D>>,
    Path(service_id): Path<String>,
) -> Response
where
    D: DirectoryRepository + 'static,
{
    match directory.service(&ServiceId(service_id)) {
        Ok(Some(service)) => (StatusCode::OK, axum::Json(ServiceView::from(service))).into_response(),
        Ok(None) => not_found("service not found"),
        Err(err) => unavailable(err),
    }
}

pub(crate) async fn list_consultants<D>(State(directory): State<Arc<D>>) -> Response
where
    D: DirectoryRepository + 'static,
{
    match directory.consultants() {
        Ok(consultants) => {
            let views: Vec<ConsultantView> = consultants
                .into_iter()
                .filter(|record| record.verified)
                .map(ConsultantView::from)
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => unavailable(err),
    }
}

pub(crate) async fn get_consultant<D>(
    State(directory): State<Arc<D>>,
    Path(consultant_id): Path<String>,
) -> Response
where
    D: DirectoryRepository + 'static,
{
    match consultant(directory.as_ref(), &UserId(consultant_id)) {
        Ok(Some(record)) => {
            (StatusCode::OK, axum::Json(ConsultantView::from(record))).into_response()
        }
        Ok(None) => not_found("consultant not found"),
        Err(err) => unavailable(err),
    }
}

fn not_found(message: &str) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn unavailable(err: super::repository::DirectoryError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
