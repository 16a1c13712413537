use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::UserId;

/// Identifier wrapper for stored quiz results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuizResultId(pub String);

/// One answered question as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: String,
    pub weight: u8,
    pub answer_text: String,
}

/// Skin-type category derived from the normalized answer weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinType {
    Dry,
    Combination,
    Normal,
    Oily,
}

impl SkinType {
    pub const fn label(self) -> &'static str {
        match self {
            SkinType::Dry => "Dry",
            SkinType::Combination => "Combination",
            SkinType::Normal => "Normal",
            SkinType::Oily => "Oily",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Dry" => Some(SkinType::Dry),
            "Combination" => Some(SkinType::Combination),
            "Normal" => Some(SkinType::Normal),
            "Oily" => Some(SkinType::Oily),
            _ => None,
        }
    }
}

/// Stored quiz submission. Immutable once created; the skin type is derived
/// from the answers at creation time and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResultRecord {
    pub id: QuizResultId,
    pub user_id: Option<UserId>,
    pub answers: Vec<QuizAnswer>,
    pub skin_type: SkinType,
    pub created_at: DateTime<Utc>,
}

impl QuizResultRecord {
    pub fn view(&self) -> QuizResultView {
        QuizResultView {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            skin_type: self.skin_type.label(),
            answers: self.answers.clone(),
            created_at: self.created_at,
        }
    }
}

/// Result projection returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct QuizResultView {
    pub id: QuizResultId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub skin_type: &'static str,
    pub answers: Vec<QuizAnswer>,
    pub created_at: DateTime<Utc>,
}
