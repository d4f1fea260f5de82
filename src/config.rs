//! Run configuration shared by the CLI and library callers.

use std::path::PathBuf;

pub const DEFAULT_ANSWERS_PATH: &str = "answers.jsonl";
pub const DEFAULT_KEY_PATH: &str = "correct_answers.txt";
pub const DEFAULT_IRRATIONAL_THRESHOLD: f64 = 0.25;
pub const DEFAULT_TOP: usize = 10;

/// Inputs and tuning knobs for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub answers_path: PathBuf,
    pub key_path: PathBuf,
    /// A row is irrational when its `p_correct` is strictly below this value.
    pub irrational_threshold: f64,
    /// Maximum number of entries in each ranking.
    pub top: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            answers_path: PathBuf::from(DEFAULT_ANSWERS_PATH),
            key_path: PathBuf::from(DEFAULT_KEY_PATH),
            irrational_threshold: DEFAULT_IRRATIONAL_THRESHOLD,
            top: DEFAULT_TOP,
        }
    }
}

impl AnalysisConfig {
    pub fn with_paths(answers_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            answers_path: answers_path.into(),
            key_path: key_path.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli() {
        let config = AnalysisConfig::default();
        assert_eq!(config.answers_path, PathBuf::from("answers.jsonl"));
        assert_eq!(config.key_path, PathBuf::from("correct_answers.txt"));
        assert_eq!(config.irrational_threshold, 0.25);
        assert_eq!(config.top, 10);
    }

    #[test]
    fn test_with_paths_keeps_default_tuning() {
        let config = AnalysisConfig::with_paths("a.jsonl", "k.txt");
        assert_eq!(config.answers_path, PathBuf::from("a.jsonl"));
        assert_eq!(config.key_path, PathBuf::from("k.txt"));
        assert_eq!(config.top, DEFAULT_TOP);
    }
}
