use crate::analyzers::grade::{bucket_for, is_irrational};
use crate::analyzers::types::{
    BucketStats, CalibrationBucket, CalibrationSummary, GradedRow, QuestionStats, RunStats,
};
use crate::analyzers::utility::{brier, top_k_by};
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;
use tracing::debug;

/// Aggregates graded rows into pooled statistics, the three-bucket
/// calibration table, and the per-run / per-question rankings.
///
/// Pooled figures, buckets and counts do not depend on row order. Ranking
/// ties between questions fall back to first-seen order; ties between runs
/// fall back to ascending run id.
pub fn aggregate_rows(
    rows: &[GradedRow],
    irrational_threshold: f64,
    top: usize,
) -> CalibrationSummary {
    let n = rows.len();

    let pooled_brier = brier(rows.iter().map(|r| (r.p_correct, r.outcome())));
    let pooled_accuracy = if n == 0 {
        0.0
    } else {
        rows.iter().filter(|r| r.correct).count() as f64 / n as f64
    };

    let mut runs: BTreeMap<i64, RunStats> = BTreeMap::new();
    let mut questions: IndexMap<i64, QuestionStats> = IndexMap::new();
    // First irrational occurrence per question; breaks ranking ties.
    let mut irrational_order: IndexSet<i64> = IndexSet::new();

    let mut buckets = CalibrationBucket::ALL.map(BucketStats::new);
    let mut outside_buckets = 0usize;

    for row in rows {
        let irrational = is_irrational(row.p_correct, irrational_threshold);

        let run = runs.entry(row.run).or_insert(RunStats {
            run: row.run,
            total: 0,
            irrational: 0,
        });
        run.total += 1;

        let question = questions
            .entry(row.question_id)
            .or_insert_with(|| QuestionStats::new(row.question_id));
        question.answered += 1;
        question.abs_error_sum += row.abs_error();

        if irrational {
            run.irrational += 1;
            question.irrational += 1;
            irrational_order.insert(row.question_id);
        }

        match bucket_for(row.p_correct) {
            Some(bucket) => {
                let b = &mut buckets[bucket.index()];
                b.count += 1;
                b.sum_p += row.p_correct;
                b.sum_y += row.outcome();
            }
            None => outside_buckets += 1,
        }
    }

    let irrational_questions: Vec<QuestionStats> = irrational_order
        .iter()
        .filter_map(|qid| questions.get(qid).cloned())
        .collect();
    let top_irrational_questions = top_k_by(irrational_questions, top, |q| q.irrational);

    let runs: Vec<RunStats> = runs.into_values().collect();
    let questions: Vec<QuestionStats> = questions.into_values().collect();

    let mut top_irrational_runs: Vec<RunStats> =
        runs.iter().filter(|r| r.irrational > 0).copied().collect();
    top_irrational_runs.sort_by(|a, b| b.irrational.cmp(&a.irrational).then(a.run.cmp(&b.run)));
    top_irrational_runs.truncate(top);

    let top_miscalibrated_questions = top_k_by(questions.clone(), top, |q| q.mean_abs_error());

    debug!(
        rows = n,
        runs = runs.len(),
        questions = questions.len(),
        outside_buckets,
        "Aggregated graded rows"
    );

    CalibrationSummary {
        total_rows: n,
        pooled_accuracy,
        pooled_brier,
        irrational_threshold,
        top,
        buckets,
        outside_buckets,
        runs,
        questions,
        top_irrational_runs,
        top_irrational_questions,
        top_miscalibrated_questions,
    }
}
