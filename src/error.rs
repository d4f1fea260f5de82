//! Fatal errors that abort a run before any report is printed.

use std::path::PathBuf;

use thiserror::Error;

use crate::stats::LoadStats;

#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No key entries loaded from {}", path.display())]
    EmptyKey { path: PathBuf },

    #[error("No usable rows in {}. Stats: {stats}", path.display())]
    NoUsableRows { path: PathBuf, stats: LoadStats },
}

pub type CalibrationResult<T> = Result<T, CalibrationError>;
