use crate::analyzers::aggregate::aggregate_rows;
use crate::analyzers::types::CalibrationSummary;
use crate::config::AnalysisConfig;
use crate::key::load_key;
use crate::parser::load_answers;
use crate::stats::LoadStats;
use anyhow::Result;
use tracing::info;

/// Everything the report needs: the line tally and the aggregate.
#[derive(Debug)]
pub struct Analysis {
    pub stats: LoadStats,
    pub summary: CalibrationSummary,
}

/// Loads the key, grades the answers file against it, and aggregates the
/// surviving rows.
///
/// # Errors
///
/// Fails on unreadable inputs, an empty key, or when no answer line survives.
#[tracing::instrument(skip(config), fields(answers = %config.answers_path.display(), key = %config.key_path.display()))]
pub fn analyze(config: &AnalysisConfig) -> Result<Analysis> {
    let key = load_key(&config.key_path)?;
    info!(entries = key.len(), "Answer key loaded");

    let loaded = load_answers(&config.answers_path, &key)?;
    let summary = aggregate_rows(&loaded.rows, config.irrational_threshold, config.top);

    info!(
        rows = summary.total_rows,
        accuracy = summary.pooled_accuracy,
        brier = summary.pooled_brier,
        "Calibration aggregated"
    );

    Ok(Analysis {
        stats: loaded.stats,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalibrationError;
    use std::fs;

    fn write_inputs(dir: &std::path::Path, key: &str, answers: &str) -> AnalysisConfig {
        let key_path = dir.join("correct_answers.txt");
        let answers_path = dir.join("answers.jsonl");
        fs::write(&key_path, key).unwrap();
        fs::write(&answers_path, answers).unwrap();
        AnalysisConfig::with_paths(answers_path, key_path)
    }

    #[test]
    fn test_analyze_two_row_pool() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(
            dir.path(),
            "1 A\n2 B\n",
            concat!(
                r#"{"run":1,"id":1,"answer":"A","p_correct":0.9}"#,
                "\n",
                r#"{"run":1,"id":2,"answer":"C","p_correct":0.1}"#,
                "\n",
            ),
        );

        let analysis = analyze(&config).unwrap();
        assert_eq!(analysis.stats.ok, 2);
        assert_eq!(analysis.summary.total_rows, 2);
        assert!((analysis.summary.pooled_accuracy - 0.5).abs() < 1e-12);
        assert!((analysis.summary.pooled_brier - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_analyze_empty_key_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(
            dir.path(),
            "bogus\n",
            r#"{"run":1,"id":1,"answer":"A","p_correct":0.9}"#,
        );

        let err = analyze(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CalibrationError>(),
            Some(CalibrationError::EmptyKey { .. })
        ));
    }

    #[test]
    fn test_analyze_no_rows_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path(), "1 A\n", "{\"parse_error\": true}\n");

        let err = analyze(&config).unwrap_err();
        assert!(err.to_string().contains("parse_error_lines=1"));
    }
}
