use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::BookingId;
use crate::directory::{ServiceId, UserId};

/// Identifier wrapper for stored feedback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedbackId(pub String);

/// One customer's rating of a completed booking. Service and consultant
/// references are copied from the booking at creation time so averages can
/// be computed without joins; each rating/comment pair is independently
/// optional, but at least one rating must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    pub booking_id: BookingId,
    pub service_id: ServiceId,
    pub consultant_id: Option<UserId>,
    pub service_rating: Option<u8>,
    pub service_comment: String,
    pub consultant_rating: Option<u8>,
    pub consultant_comment: String,
    pub created_at: DateTime<Utc>,
}

/// Which side of the feedback an average is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingSubject {
    Service,
    Consultant,
}

impl RatingSubject {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "service" => Some(RatingSubject::Service),
            "consultant" => Some(RatingSubject::Consultant),
            _ => None,
        }
    }
}

/// Running mean over all feedback carrying a rating for the entity.
/// `{0, 0}` is the explicit no-feedback default, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageRating {
    pub average_rating: f64,
    pub total_reviews: usize,
}

impl AverageRating {
    pub fn none() -> Self {
        Self {
            average_rating: 0.0,
            total_reviews: 0,
        }
    }

    pub fn of(ratings: &[u8]) -> Self {
        if ratings.is_empty() {
            return Self::none();
        }
        let sum: u32 = ratings.iter().map(|rating| u32::from(*rating)).sum();
        Self {
            average_rating: f64::from(sum) / ratings.len() as f64,
            total_reviews: ratings.len(),
        }
    }
}
