use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{BookingId, BookingStatus};
use super::repository::{BookingRepository, RepositoryError};
use super::service::{BookingService, BookingServiceError, CreateBookingInput};
use crate::auth::{authenticate, require_role, AuthError, Sessions};
use crate::directory::{DirectoryRepository, UserId, UserRole};

/// Roles allowed to manage bookings on behalf of the business.
const STAFF_ROLES: [UserRole; 3] = [UserRole::Staff, UserRole::Manager, UserRole::Admin];

/// Router builder exposing the booking lifecycle and assignment endpoints.
pub fn booking_router<R, D>(service: Arc<BookingService<R, D>>, sessions: Sessions) -> Router
where
    R: BookingRepository + 'static,
    D: DirectoryRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/booking-requests",
            post(create_handler::<R, D>).get(list_all_handler::<R, D>),
        )
        .route(
            "/api/v1/booking-requests/history-bookings",
            get(history_handler::<R, D>),
        )
        .route(
            "/api/v1/booking-requests/:booking_id/cancel",
            put(cancel_handler::<R, D>),
        )
        .route(
            "/api/v1/booking-requests/:booking_id/status",
            put(status_handler::<R, D>),
        )
        .route(
            "/api/v1/consultants/available/:booking_id",
            get(available_handler::<R, D>),
        )
        .route(
            "/api/v1/bookings/assign-consultant",
            put(assign_handler::<R, D>),
        )
        .layer(Extension(sessions))
        .with_state(service)
}

/// Create payload; field spellings follow the platform's existing clients.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateBookingRequest {
    #[serde(rename = "serviceID")]
    pub(crate) service_id: String,
    #[serde(rename = "customerID")]
    pub(crate) customer_id: String,
    pub(crate) date: String,
    pub(crate) time: String,
    #[serde(rename = "consultantID", default)]
    pub(crate) consultant_id: Option<String>,
}

pub(crate) async fn create_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<CreateBookingRequest>,
) -> Response
where
    R: BookingRepository + 'static,
    D: DirectoryRepository + 'static,
{
    if let Err(err) = authenticate(&headers, sessions.as_ref()) {
        return err.into_response();
    }

    let input = CreateBookingInput {
        service_id: request.service_id,
        customer_id: request.customer_id,
        date: request.date,
        time: request.time,
        consultant_id: request.consultant_id,
    };

    match service.create(input) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => booking_error_response(err),
    }
}

pub(crate) async fn list_all_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
) -> Response
where
    R: BookingRepository + 'static,
    D: DirectoryRepository + 'static,
{
    match staff_session(&headers, &sessions) {
        Ok(_) => {}
        Err(err) => return err.into_response(),
    }

    match service.list_all() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => booking_error_response(err),
    }
}

pub(crate) async fn history_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
) -> Response
where
    R: BookingRepository + 'static,
    D: DirectoryRepository + 'static,
{
    let session = match authenticate(&headers, sessions.as_ref()) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    match service.list_for_customer(&session.user_id) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => booking_error_response(err),
    }
}

pub(crate) async fn cancel_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
) -> Response
where
    R: BookingRepository + 'static,
    D: DirectoryRepository + 'static,
{
    let session = match authenticate(&headers, sessions.as_ref()) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    let id = BookingId(booking_id);
    let booking = match service.get(&id) {
        Ok(record) => record,
        Err(err) => return booking_error_response(err),
    };

    // Customers may cancel their own bookings; staff may cancel any.
    if booking.customer_id != session.user_id
        && require_role(&session, &STAFF_ROLES).is_err()
    {
        return AuthError::Forbidden.into_response();
    }

    match service.cancel(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => booking_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    pub(crate) status: BookingStatus,
}

pub(crate) async fn status_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    R: BookingRepository + 'static,
    D: DirectoryRepository + 'static,
{
    match staff_session(&headers, &sessions) {
        Ok(_) => {}
        Err(err) => return err.into_response(),
    }

    match service.update_status(&BookingId(booking_id), request.status) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => booking_error_response(err),
    }
}

pub(crate) async fn available_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
) -> Response
where
    R: BookingRepository + 'static,
    D: DirectoryRepository + 'static,
{
    match staff_session(&headers, &sessions) {
        Ok(_) => {}
        Err(err) => return err.into_response(),
    }

    match service.available_consultants(&BookingId(booking_id)) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => booking_error_response(err),
    }
}

/// Assignment payload; field spellings follow the platform's existing
/// clients.
#[derive(Debug, Deserialize)]
pub(crate) struct AssignConsultantRequest {
    #[serde(rename = "bookingID")]
    pub(crate) booking_id: String,
    #[serde(rename = "consultantID")]
    pub(crate) consultant_id: String,
}

pub(crate) async fn assign_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<AssignConsultantRequest>,
) -> Response
where
    R: BookingRepository + 'static,
    D: DirectoryRepository + 'static,
{
    match staff_session(&headers, &sessions) {
        Ok(_) => {}
        Err(err) => return err.into_response(),
    }

    match service.assign(
        &BookingId(request.booking_id),
        &UserId(request.consultant_id),
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => booking_error_response(err),
    }
}

fn staff_session(
    headers: &HeaderMap,
    sessions: &Sessions,
) -> Result<crate::auth::Session, AuthError> {
    let session = authenticate(headers, sessions.as_ref())?;
    require_role(&session, &STAFF_ROLES)?;
    Ok(session)
}

fn booking_error_response(err: BookingServiceError) -> Response {
    let status = match &err {
        BookingServiceError::Validation(_) | BookingServiceError::Transition(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        BookingServiceError::Repository(RepositoryError::NotFound)
        | BookingServiceError::UnknownService(_)
        | BookingServiceError::UnknownCustomer(_)
        | BookingServiceError::UnknownConsultant(_) => StatusCode::NOT_FOUND,
        BookingServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        BookingServiceError::Repository(RepositoryError::Unavailable(_))
        | BookingServiceError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
