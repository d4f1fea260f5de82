//! Data types used by the aggregation pipeline.

use serde::Serialize;

use crate::stats::LoadStats;

/// One answer joined against the key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradedRow {
    pub run: i64,
    pub question_id: i64,
    /// Self-reported probability of being correct, within `[0, 1]`.
    pub p_correct: f64,
    pub correct: bool,
}

impl GradedRow {
    /// The binary outcome `y` as a number.
    pub fn outcome(&self) -> f64 {
        if self.correct { 1.0 } else { 0.0 }
    }

    /// Absolute calibration error `|p - y|`.
    pub fn abs_error(&self) -> f64 {
        (self.p_correct - self.outcome()).abs()
    }
}

/// The three fixed probability ranges of the calibration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalibrationBucket {
    /// `[0.25, 0.50)`
    Low,
    /// `[0.50, 0.75)`
    Mid,
    /// `[0.75, 1.00]`
    High,
}

impl CalibrationBucket {
    pub const ALL: [CalibrationBucket; 3] = [
        CalibrationBucket::Low,
        CalibrationBucket::Mid,
        CalibrationBucket::High,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CalibrationBucket::Low => "[0.25,0.5)",
            CalibrationBucket::Mid => "[0.5,0.75)",
            CalibrationBucket::High => "[0.75,1]",
        }
    }

    pub fn index(self) -> usize {
        match self {
            CalibrationBucket::Low => 0,
            CalibrationBucket::Mid => 1,
            CalibrationBucket::High => 2,
        }
    }
}

/// Accumulated rows for one calibration bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStats {
    pub bucket: CalibrationBucket,
    pub count: usize,
    pub sum_p: f64,
    pub sum_y: f64,
}

impl BucketStats {
    pub fn new(bucket: CalibrationBucket) -> Self {
        Self {
            bucket,
            count: 0,
            sum_p: 0.0,
            sum_y: 0.0,
        }
    }

    pub fn mean_p(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum_p / self.count as f64)
    }

    /// Observed accuracy inside the bucket.
    pub fn accuracy(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum_y / self.count as f64)
    }

    /// `accuracy - mean_p`. Negative means overconfident.
    pub fn gap(&self) -> Option<f64> {
        Some(self.accuracy()? - self.mean_p()?)
    }
}

/// Row and irrational-row counts for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub run: i64,
    pub total: usize,
    pub irrational: usize,
}

impl RunStats {
    pub fn irrational_pct(&self) -> f64 {
        LoadStats::pct(self.irrational, self.total)
    }
}

/// Irrationality and calibration error for a single question id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStats {
    pub question_id: i64,
    pub irrational: usize,
    pub answered: usize,
    pub abs_error_sum: f64,
}

impl QuestionStats {
    pub fn new(question_id: i64) -> Self {
        Self {
            question_id,
            irrational: 0,
            answered: 0,
            abs_error_sum: 0.0,
        }
    }

    /// Mean `|p - y|` over every graded row for this question.
    pub fn mean_abs_error(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            self.abs_error_sum / self.answered as f64
        }
    }

    pub fn irrational_pct(&self) -> f64 {
        LoadStats::pct(self.irrational, self.answered.max(1))
    }
}

/// Complete aggregation result for one graded-row pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationSummary {
    pub total_rows: usize,
    pub pooled_accuracy: f64,
    pub pooled_brier: f64,
    pub irrational_threshold: f64,
    pub top: usize,
    pub buckets: [BucketStats; 3],
    /// Rows with `p` below the lowest bucket boundary.
    pub outside_buckets: usize,
    /// Every run present, ascending by run id.
    pub runs: Vec<RunStats>,
    /// Every question present, in first-seen order.
    pub questions: Vec<QuestionStats>,
    pub top_irrational_runs: Vec<RunStats>,
    pub top_irrational_questions: Vec<QuestionStats>,
    pub top_miscalibrated_questions: Vec<QuestionStats>,
}
