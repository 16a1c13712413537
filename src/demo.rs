use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Args;

use dermabook::booking::{BookingService, BookingStatus, CreateBookingInput, TimeSlot};
use dermabook::directory::{DirectoryRepository, UserId};
use dermabook::error::AppError;
use dermabook::feedback::{FeedbackService, RatingSubject, SubmitFeedbackInput};
use dermabook::quiz::{QuizAnswer, QuizService};

use crate::infra::{
    parse_date, parse_slot, seed_directory, InMemoryBookingRepository,
    InMemoryFeedbackRepository, InMemoryQuizResultRepository,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Booking date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Booking time slot (e.g. "09:00 AM").
    #[arg(long, value_parser = parse_slot)]
    pub(crate) time: Option<TimeSlot>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let slot = args.time.unwrap_or(TimeSlot::NineAm);

    let directory = Arc::new(seed_directory());
    let bookings = Arc::new(InMemoryBookingRepository::default());
    let quiz_results = Arc::new(InMemoryQuizResultRepository::default());
    let feedback_records = Arc::new(InMemoryFeedbackRepository::default());

    let booking_service = BookingService::new(bookings.clone(), directory.clone());
    let quiz_service = QuizService::new(quiz_results);
    let feedback_service = FeedbackService::new(bookings, feedback_records);

    println!("Skincare consultation demo ({date}, {slot})");

    println!("\nCatalog");
    match directory.services() {
        Ok(services) => {
            for service in services {
                println!("- {} ({}): {} VND", service.id, service.name, service.price);
            }
        }
        Err(err) => {
            println!("  Catalog unavailable: {err}");
            return Ok(());
        }
    }

    println!("\nQuiz");
    let answers = vec![
        answer("q-shine", 4, "My skin looks shiny by midday"),
        answer("q-pores", 3, "Pores are visible on my nose and cheeks"),
        answer("q-breakouts", 4, "I break out most weeks"),
        answer("q-tightness", 2, "Skin rarely feels tight"),
    ];
    let quiz_result = match quiz_service.submit(Some(UserId("user-an".to_string())), answers) {
        Ok(result) => result,
        Err(err) => {
            println!("  Quiz rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} scored as {} from {} answers",
        quiz_result.id.0,
        quiz_result.skin_type.label(),
        quiz_result.answers.len()
    );

    println!("\nBooking");
    let booking = match booking_service.create(CreateBookingInput {
        service_id: "svc-acne-program".to_string(),
        customer_id: "user-an".to_string(),
        date: date.to_string(),
        time: slot.label().to_string(),
        consultant_id: None,
    }) {
        Ok(record) => record,
        Err(err) => {
            println!("  Booking rejected: {err}");
            return Ok(());
        }
    };
    println!("- Created {} -> status {}", booking.id, booking.status);

    let available = match booking_service.available_consultants(&booking.id) {
        Ok(views) => views,
        Err(err) => {
            println!("  Availability unavailable: {err}");
            return Ok(());
        }
    };
    println!("- Available consultants:");
    for consultant in &available {
        println!("  - {} ({})", consultant.name, consultant.id);
    }

    let Some(choice) = available.first() else {
        println!("  No consultant free for {date} {slot}");
        return Ok(());
    };
    let assigned = match booking_service.assign(&booking.id, &choice.id) {
        Ok(record) => record,
        Err(err) => {
            println!("  Assignment failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Assigned {} (status unchanged: {})",
        choice.name, assigned.status
    );

    for next in [BookingStatus::Confirmed, BookingStatus::Completed] {
        match booking_service.update_status(&booking.id, next) {
            Ok(record) => println!("- Status -> {}", record.status),
            Err(err) => {
                println!("  Status update failed: {err}");
                return Ok(());
            }
        }
    }

    println!("\nFeedback");
    let feedback = match feedback_service.submit(SubmitFeedbackInput {
        booking_id: booking.id.0.clone(),
        service_rating: Some(5),
        service_comment: Some("Visible improvement after one visit".to_string()),
        consultant_rating: Some(4),
        consultant_comment: Some("Clear, practical routine".to_string()),
    }) {
        Ok(record) => record,
        Err(err) => {
            println!("  Feedback rejected: {err}");
            return Ok(());
        }
    };
    println!("- Stored {} for {}", feedback.id.0, feedback.booking_id);

    if let Ok(average) = feedback_service.average(RatingSubject::Service, "svc-acne-program") {
        println!(
            "- Service average: {:.1} over {} review(s)",
            average.average_rating, average.total_reviews
        );
    }
    if let Ok(average) = feedback_service.average(RatingSubject::Consultant, &choice.id.0) {
        println!(
            "- Consultant average: {:.1} over {} review(s)",
            average.average_rating, average.total_reviews
        );
    }

    match serde_json::to_string_pretty(&feedback) {
        Ok(json) => println!("\nFeedback payload:\n{json}"),
        Err(err) => println!("\nFeedback payload unavailable: {err}"),
    }

    Ok(())
}

fn answer(question_id: &str, weight: u8, text: &str) -> QuizAnswer {
    QuizAnswer {
        question_id: question_id.to_string(),
        weight,
        answer_text: text.to_string(),
    }
}
