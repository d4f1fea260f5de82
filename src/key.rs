//! Ground-truth answer key loader.
//!
//! The key file holds one `<question_id> <choice>` pair per line. Lines that
//! do not fit that shape are skipped without a diagnostic in the report.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::error::{CalibrationError, CalibrationResult};

/// One of the four multiple-choice options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerChoice {
    A,
    B,
    C,
    D,
}

impl AnswerChoice {
    /// Parses a choice case-insensitively, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(AnswerChoice::A),
            "B" => Some(AnswerChoice::B),
            "C" => Some(AnswerChoice::C),
            "D" => Some(AnswerChoice::D),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnswerChoice::A => "A",
            AnswerChoice::B => "B",
            AnswerChoice::C => "C",
            AnswerChoice::D => "D",
        };
        f.write_str(s)
    }
}

/// Mapping from question id to its correct choice.
#[derive(Debug, Default, Clone)]
pub struct AnswerKey {
    entries: HashMap<i64, AnswerChoice>,
}

impl AnswerKey {
    /// Inserts an entry, returning the choice it replaced.
    ///
    /// A later entry for the same question id wins.
    pub fn insert(&mut self, question_id: i64, choice: AnswerChoice) -> Option<AnswerChoice> {
        self.entries.insert(question_id, choice)
    }

    pub fn get(&self, question_id: i64) -> Option<AnswerChoice> {
        self.entries.get(&question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(i64, AnswerChoice)> for AnswerKey {
    fn from_iter<I: IntoIterator<Item = (i64, AnswerChoice)>>(iter: I) -> Self {
        let mut key = AnswerKey::default();
        for (qid, choice) in iter {
            key.insert(qid, choice);
        }
        key
    }
}

/// Parses a single key line into `(question_id, choice)`.
///
/// Tokens after the second are ignored.
pub fn parse_key_line(line: &str) -> Option<(i64, AnswerChoice)> {
    let mut tokens = line.split_whitespace();
    let qid = tokens.next()?;
    let choice = tokens.next()?;

    let qid = qid.parse::<i64>().ok()?;
    let choice = AnswerChoice::parse(choice)?;
    Some((qid, choice))
}

/// Reads key lines from `reader`. May return an empty key.
pub fn parse_key<R: BufRead>(reader: R) -> std::io::Result<AnswerKey> {
    let mut key = AnswerKey::default();
    let mut skipped = 0usize;

    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let parsed = std::str::from_utf8(&bytes).ok().and_then(parse_key_line);
        match parsed {
            Some((qid, choice)) => {
                if let Some(previous) = key.insert(qid, choice) {
                    debug!(
                        line = idx + 1,
                        question_id = qid,
                        %previous,
                        %choice,
                        "Duplicate key entry overwrites earlier one"
                    );
                }
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "Skipped malformed key lines");
    }

    Ok(key)
}

/// Loads the key file at `path`.
///
/// # Errors
///
/// Fails if the file cannot be read or yields no entries.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_key(path: &Path) -> CalibrationResult<AnswerKey> {
    let io_err = |source| CalibrationError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let key = parse_key(BufReader::new(file)).map_err(io_err)?;

    if key.is_empty() {
        return Err(CalibrationError::EmptyKey {
            path: path.to_path_buf(),
        });
    }

    Ok(key)
}
