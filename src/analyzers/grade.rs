use crate::analyzers::types::CalibrationBucket;
use crate::key::AnswerChoice;

/// Correctness label for an answer against the key's choice.
pub fn grade(answer: AnswerChoice, correct: AnswerChoice) -> bool {
    answer == correct
}

/// Places a probability into its calibration bucket.
///
/// | Range          | Bucket |
/// |----------------|--------|
/// | [0.75, 1.00]   | High   |
/// | [0.50, 0.75)   | Mid    |
/// | [0.25, 0.50)   | Low    |
/// | otherwise      | none   |
pub fn bucket_for(p: f64) -> Option<CalibrationBucket> {
    match p {
        p if (0.75..=1.0).contains(&p) => Some(CalibrationBucket::High),
        p if (0.50..0.75).contains(&p) => Some(CalibrationBucket::Mid),
        p if (0.25..0.50).contains(&p) => Some(CalibrationBucket::Low),
        _ => None,
    }
}

/// A row is irrational when its stated confidence is strictly below `threshold`.
pub fn is_irrational(p: f64, threshold: f64) -> bool {
    p < threshold
}
