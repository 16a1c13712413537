use super::domain::{QuizAnswer, SkinType};

/// Map a non-empty answer set to a skin-type category.
///
/// Weights are drawn from {1, 2, 3, 4}; the total is normalized against the
/// all-ones and all-fours extremes and bucketed on a 0-100 scale. Returns
/// `None` for an empty answer set, where the normalization range collapses —
/// callers reject that input before storing anything.
pub(crate) fn score_answers(answers: &[QuizAnswer]) -> Option<SkinType> {
    if answers.is_empty() {
        return None;
    }

    let total: u32 = answers.iter().map(|answer| u32::from(answer.weight)).sum();
    let count = answers.len() as f32;
    let min_weight = count;
    let max_weight = count * 4.0;
    let normalized = ((total as f32 - min_weight) / (max_weight - min_weight)) * 100.0;

    Some(if normalized <= 25.0 {
        SkinType::Dry
    } else if normalized <= 50.0 {
        SkinType::Combination
    } else if normalized <= 75.0 {
        SkinType::Normal
    } else {
        SkinType::Oily
    })
}
