//! JSON-Lines parser for model answers.
//!
//! Each line is graded against the [`AnswerKey`] or tallied under the first
//! [`RejectReason`] that applies.

use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::grade::grade;
use crate::analyzers::types::GradedRow;
use crate::error::{CalibrationError, CalibrationResult};
use crate::key::{AnswerChoice, AnswerKey};
use crate::stats::{LoadStats, RejectReason};

/// Graded rows plus the tally of every line that was read.
#[derive(Debug, Default)]
pub struct LoadedAnswers {
    pub rows: Vec<GradedRow>,
    pub stats: LoadStats,
}

/// Grades one non-blank line.
pub fn grade_line(line: &str, key: &AnswerKey) -> Result<GradedRow, RejectReason> {
    let obj: Map<String, Value> =
        serde_json::from_str(line).map_err(|_| RejectReason::BadJson)?;

    if obj.get("parse_error").is_some_and(is_truthy) {
        return Err(RejectReason::ParseError);
    }

    let run = obj.get("run").and_then(coerce_int);
    let question_id = obj.get("id").and_then(coerce_int);
    let answer = obj.get("answer").map(coerce_text);
    let p_correct = obj.get("p_correct").and_then(coerce_float);

    let (Some(run), Some(question_id), Some(answer), Some(p_correct)) =
        (run, question_id, answer, p_correct)
    else {
        return Err(RejectReason::BadFields);
    };

    let Some(answer) = AnswerChoice::parse(&answer) else {
        return Err(RejectReason::BadValue);
    };
    if !(0.0..=1.0).contains(&p_correct) {
        return Err(RejectReason::BadValue);
    }

    let correct = key.get(question_id).ok_or(RejectReason::NoKey)?;

    Ok(GradedRow {
        run,
        question_id,
        p_correct,
        correct: grade(answer, correct),
    })
}

/// Reads answer lines from `reader`, skipping blank ones.
///
/// A line that is not valid UTF-8 is tallied as `bad_json`.
pub fn parse_answers<R: BufRead>(reader: R, key: &AnswerKey) -> std::io::Result<LoadedAnswers> {
    let mut loaded = LoadedAnswers::default();

    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let graded = match std::str::from_utf8(&bytes) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                grade_line(line, key)
            }
            Err(_) => Err(RejectReason::BadJson),
        };

        match graded {
            Ok(row) => {
                loaded.rows.push(row);
                loaded.stats.record_ok();
            }
            Err(reason) => {
                debug!(line = idx + 1, %reason, "Skipping answer line");
                loaded.stats.record_reject(reason);
            }
        }
    }

    Ok(loaded)
}

/// Loads and grades the answers file at `path`.
///
/// # Errors
///
/// Fails if the file cannot be read or no line survives grading.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_answers(path: &Path, key: &AnswerKey) -> CalibrationResult<LoadedAnswers> {
    let io_err = |source| CalibrationError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let loaded = parse_answers(BufReader::new(file), key).map_err(io_err)?;

    if loaded.rows.is_empty() {
        return Err(CalibrationError::NoUsableRows {
            path: path.to_path_buf(),
            stats: loaded.stats,
        });
    }

    info!(
        ok = loaded.stats.ok,
        rejected = loaded.stats.rejected(),
        "Answers graded"
    );
    Ok(loaded)
}

/// JSON truthiness: null, false, zero and empty containers are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?.trunc();
            (f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Any JSON value renders to text; non-letters then fail the choice check.
fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}
