use super::common::*;
use crate::booking::domain::{BookingId, BookingStatus, TimeSlot};
use crate::booking::repository::{BookingRepository, RepositoryError};
use crate::booking::service::{BookingServiceError, BookingValidationError, CreateBookingInput};
use crate::directory::UserId;

#[test]
fn create_defaults_to_pending_without_consultant() {
    let (service, _, _) = build_service();

    let record = service.create(create_input()).expect("booking created");

    assert_eq!(record.status, BookingStatus::Pending);
    assert_eq!(record.date.to_string(), "2025-01-01");
    assert_eq!(record.slot, TimeSlot::NineAm);
    assert!(record.consultant_id.is_none());
    assert!(!record.consultant_chosen_by_customer);
}

#[test]
fn create_marks_customer_chosen_consultants() {
    let (service, _, _) = build_service();

    let record = service
        .create(CreateBookingInput {
            consultant_id: Some("cons-lan".to_string()),
            ..create_input()
        })
        .expect("booking created");

    assert_eq!(record.consultant_id, Some(UserId("cons-lan".to_string())));
    assert!(record.consultant_chosen_by_customer);
    assert_eq!(record.status, BookingStatus::Pending);
}

#[test]
fn create_rejects_blank_fields() {
    let (service, _, _) = build_service();

    for (input, field) in [
        (
            CreateBookingInput {
                service_id: "  ".to_string(),
                ..create_input()
            },
            "service",
        ),
        (
            CreateBookingInput {
                customer_id: String::new(),
                ..create_input()
            },
            "customer",
        ),
        (
            CreateBookingInput {
                date: String::new(),
                ..create_input()
            },
            "date",
        ),
        (
            CreateBookingInput {
                time: String::new(),
                ..create_input()
            },
            "time",
        ),
    ] {
        match service.create(input) {
            Err(BookingServiceError::Validation(BookingValidationError::MissingField(name))) => {
                assert_eq!(name, field)
            }
            other => panic!("expected missing `{field}` rejection, got {other:?}"),
        }
    }
}

#[test]
fn create_rejects_malformed_dates_and_slots() {
    let (service, _, _) = build_service();

    match service.create(CreateBookingInput {
        date: "01/02/2025".to_string(),
        ..create_input()
    }) {
        Err(BookingServiceError::Validation(BookingValidationError::InvalidDate(_))) => {}
        other => panic!("expected date rejection, got {other:?}"),
    }

    match service.create(CreateBookingInput {
        time: "9am".to_string(),
        ..create_input()
    }) {
        Err(BookingServiceError::Validation(BookingValidationError::UnknownTimeSlot(_))) => {}
        other => panic!("expected slot rejection, got {other:?}"),
    }
}

#[test]
fn create_rejects_unknown_references() {
    let (service, _, _) = build_service();

    match service.create(CreateBookingInput {
        service_id: "svc-missing".to_string(),
        ..create_input()
    }) {
        Err(BookingServiceError::UnknownService(_)) => {}
        other => panic!("expected unknown service, got {other:?}"),
    }

    match service.create(CreateBookingInput {
        customer_id: "user-missing".to_string(),
        ..create_input()
    }) {
        Err(BookingServiceError::UnknownCustomer(_)) => {}
        other => panic!("expected unknown customer, got {other:?}"),
    }

    // A real user without the Consultant capability is not assignable.
    match service.create(CreateBookingInput {
        consultant_id: Some("user-staff".to_string()),
        ..create_input()
    }) {
        Err(BookingServiceError::UnknownConsultant(_)) => {}
        other => panic!("expected unknown consultant, got {other:?}"),
    }
}

#[test]
fn cancel_is_idempotent() {
    let (service, _, _) = build_service();
    let record = service.create(create_input()).expect("booking created");

    let first = service.cancel(&record.id).expect("first cancel succeeds");
    assert_eq!(first.status, BookingStatus::Cancelled);

    let second = service.cancel(&record.id).expect("repeat cancel is a no-op");
    assert_eq!(second.status, BookingStatus::Cancelled);
}

#[test]
fn cancel_unknown_booking_is_not_found() {
    let (service, _, _) = build_service();

    match service.cancel(&BookingId("bk-missing".to_string())) {
        Err(BookingServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn update_status_walks_the_graph() {
    let (service, _, _) = build_service();
    let record = service.create(create_input()).expect("booking created");

    let confirmed = service
        .update_status(&record.id, BookingStatus::Confirmed)
        .expect("confirm succeeds");
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let completed = service
        .update_status(&record.id, BookingStatus::Completed)
        .expect("complete succeeds");
    assert_eq!(completed.status, BookingStatus::Completed);
}

#[test]
fn update_status_rejects_jumps() {
    let (service, bookings, _) = build_service();
    let record = service.create(create_input()).expect("booking created");

    match service.update_status(&record.id, BookingStatus::Completed) {
        Err(BookingServiceError::Transition(err)) => {
            assert_eq!(err.from, BookingStatus::Pending);
            assert_eq!(err.to, BookingStatus::Completed);
        }
        other => panic!("expected transition rejection, got {other:?}"),
    }

    // The record is untouched after a rejected transition.
    let stored = bookings
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, BookingStatus::Pending);
}

#[test]
fn completed_bookings_can_still_be_cancelled() {
    let (service, _, _) = build_service();
    let record = service.create(create_input()).expect("booking created");
    service
        .update_status(&record.id, BookingStatus::Confirmed)
        .expect("confirm");
    service
        .update_status(&record.id, BookingStatus::Completed)
        .expect("complete");

    let cancelled = service.cancel(&record.id).expect("cancel succeeds");
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
}

#[test]
fn listings_expand_referenced_names() {
    let (service, _, _) = build_service();
    service.create(create_input()).expect("first booking");
    service
        .create(CreateBookingInput {
            service_id: "svc-peel".to_string(),
            customer_id: "user-other".to_string(),
            time: "10:00 AM".to_string(),
            consultant_id: Some("cons-mai".to_string()),
            ..create_input()
        })
        .expect("second booking");

    let all = service.list_all().expect("list all");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].service.name, "Signature Facial");
    assert!(all[0].consultant.is_none());
    assert_eq!(all[1].service.name, "Enzyme Peel");
    assert_eq!(
        all[1].consultant.as_ref().map(|summary| summary.name.as_str()),
        Some("Mai Tran")
    );

    let own = service
        .list_for_customer(&UserId("user-customer".to_string()))
        .expect("customer history");
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].time, "09:00 AM");
    assert_eq!(own[0].status, "Pending");
}
