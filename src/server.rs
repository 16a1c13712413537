use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use dermabook::auth::Sessions;
use dermabook::booking::BookingService;
use dermabook::config::AppConfig;
use dermabook::error::AppError;
use dermabook::feedback::FeedbackService;
use dermabook::quiz::QuizService;
use dermabook::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{
    seed_directory, seed_sessions, AppState, InMemoryBookingRepository,
    InMemoryFeedbackRepository, InMemoryQuizResultRepository,
};
use crate::routes::api_router;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = Arc::new(seed_directory());
    let sessions: Sessions = Arc::new(seed_sessions(&directory));
    let bookings = Arc::new(InMemoryBookingRepository::default());
    let quiz_results = Arc::new(InMemoryQuizResultRepository::default());
    let feedback_records = Arc::new(InMemoryFeedbackRepository::default());

    let booking_service = Arc::new(BookingService::new(bookings.clone(), directory.clone()));
    let quiz_service = Arc::new(QuizService::new(quiz_results));
    let feedback_service = Arc::new(FeedbackService::new(bookings, feedback_records));

    let app = api_router(
        booking_service,
        quiz_service,
        feedback_service,
        directory,
        sessions,
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "skincare booking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
