//! Grading and calibration aggregation.
//!
//! This module joins answers against the key, folds the graded rows into
//! pooled Brier/accuracy figures, a three-bucket calibration table and the
//! irrational / miscalibrated rankings.

pub mod aggregate;
pub mod analyzer;
pub mod grade;
pub mod types;
pub mod utility;
