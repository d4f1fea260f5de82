//! CLI entry point for the calibration report.
//!
//! Grades model answers against an answer key and prints pooled accuracy,
//! Brier score, a calibration table and irrational-answer rankings.

use anyhow::Result;
use clap::Parser;
use mcq_calibration::analyzers::analyzer::analyze;
use mcq_calibration::config::{
    AnalysisConfig, DEFAULT_ANSWERS_PATH, DEFAULT_IRRATIONAL_THRESHOLD, DEFAULT_KEY_PATH,
    DEFAULT_TOP,
};
use mcq_calibration::output::{log_json, print_report};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "mcq_calibration")]
#[command(about = "Calibration statistics for multiple-choice model answers", long_about = None)]
struct Cli {
    /// JSON-Lines file of model answers
    #[arg(long, env = "MCQ_ANSWERS", default_value = DEFAULT_ANSWERS_PATH)]
    answers: PathBuf,

    /// Answer key: one "<id> <A|B|C|D>" per line
    #[arg(long, env = "MCQ_KEY", default_value = DEFAULT_KEY_PATH)]
    key: PathBuf,

    /// Answers with p_correct strictly below this are irrational
    #[arg(long = "irr-thr", env = "MCQ_IRR_THR", default_value_t = DEFAULT_IRRATIONAL_THRESHOLD, value_parser = parse_threshold)]
    irr_thr: f64,

    /// Number of entries in each ranking
    #[arg(long, env = "MCQ_TOP", default_value_t = DEFAULT_TOP)]
    top: usize,
}

impl From<Cli> for AnalysisConfig {
    fn from(cli: Cli) -> Self {
        AnalysisConfig {
            answers_path: cli.answers,
            key_path: cli.key,
            irrational_threshold: cli.irr_thr,
            top: cli.top,
        }
    }
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("threshold must be a finite number, got {s}"))
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/mcq_calibration.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("mcq_calibration.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let config = AnalysisConfig::from(Cli::parse());
    info!(
        answers = %config.answers_path.display(),
        key = %config.key_path.display(),
        irrational_threshold = config.irrational_threshold,
        top = config.top,
        "Starting calibration analysis"
    );

    let analysis = analyze(&config)?;
    log_json(&analysis.summary)?;
    print_report(&analysis)?;

    Ok(())
}
