//! Text rendering of the calibration report.
//!
//! The report goes to stdout; the JSON summary only ever goes to the log.

use anyhow::Result;
use std::io::{self, Write};
use tracing::debug;

use crate::analyzers::analyzer::Analysis;
use crate::analyzers::types::CalibrationSummary;
use crate::stats::LoadStats;

/// Logs the aggregate as JSON at debug level.
pub fn log_json(summary: &CalibrationSummary) -> Result<()> {
    debug!("{}", serde_json::to_string(summary)?);
    Ok(())
}

/// Writes the full report to stdout.
pub fn print_report(analysis: &Analysis) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &analysis.stats, &analysis.summary)?;
    out.flush()?;
    Ok(())
}

/// Renders the report sections in their fixed order.
pub fn write_report<W: Write>(
    out: &mut W,
    stats: &LoadStats,
    summary: &CalibrationSummary,
) -> io::Result<()> {
    write_tally(out, stats)?;
    writeln!(out, "Pooled accuracy: {:.4}", summary.pooled_accuracy)?;
    writeln!(out, "Pooled Brier:    {:.6}", summary.pooled_brier)?;

    write_buckets(out, summary)?;
    write_runs(out, summary)?;
    write_rankings(out, summary)?;
    Ok(())
}

fn write_tally<W: Write>(out: &mut W, stats: &LoadStats) -> io::Result<()> {
    let extras = stats
        .nonzero_rejections()
        .iter()
        .map(|(reason, n)| format!("{reason}={n}"))
        .collect::<Vec<_>>();
    let extras = if extras.is_empty() {
        "none".to_string()
    } else {
        extras.join(", ")
    };
    writeln!(out, "OK rows: {}  (other parse stats: {})", stats.ok, extras)
}

fn write_buckets<W: Write>(out: &mut W, summary: &CalibrationSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Calibration buckets (pooled):")?;
    for b in &summary.buckets {
        match (b.mean_p(), b.accuracy(), b.gap()) {
            (Some(mean_p), Some(acc), Some(gap)) => writeln!(
                out,
                "  {}: n={}  mean_p={:.3}  acc={:.3}  gap(acc-mean_p)={:+.3}",
                b.bucket.label(),
                b.count,
                mean_p,
                acc,
                gap
            )?,
            _ => writeln!(out, "  {}: n=0", b.bucket.label())?,
        }
    }
    if summary.outside_buckets > 0 {
        writeln!(out, "  (outside these buckets): n={}", summary.outside_buckets)?;
    }
    Ok(())
}

fn write_runs<W: Write>(out: &mut W, summary: &CalibrationSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Irrational (p < {}) by run:",
        format_threshold(summary.irrational_threshold)
    )?;
    for run in &summary.runs {
        writeln!(
            out,
            "  run {:>3}: {:>3}/{} ({:.3}%)",
            run.run,
            run.irrational,
            run.total,
            run.irrational_pct()
        )?;
    }
    Ok(())
}

/// Shortest round-trip float text, always with a fractional part or a
/// signed two-digit exponent: `1.0`, `0.25`, `1e-05`.
fn format_threshold(value: f64) -> String {
    let text = format!("{value:?}");
    let Some((mantissa, exp)) = text.split_once('e') else {
        return text;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return text.clone();
    };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.abs())
}

fn write_rankings<W: Write>(out: &mut W, summary: &CalibrationSummary) -> io::Result<()> {
    let top = summary.top;

    writeln!(out)?;
    writeln!(out, "Top {top} runs with most irrational answers:")?;
    if summary.top_irrational_runs.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for run in &summary.top_irrational_runs {
        writeln!(
            out,
            "  run {:>3}: {}/{} ({:.3}%)",
            run.run,
            run.irrational,
            run.total,
            run.irrational_pct()
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Top {top} question IDs with most irrational answers:")?;
    if summary.top_irrational_questions.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for q in &summary.top_irrational_questions {
        writeln!(
            out,
            "  id {:>2}: {}/{} ({:.3}%)",
            q.question_id,
            q.irrational,
            q.answered.max(1),
            q.irrational_pct()
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Top {top} most miscalibrated question IDs (mean |p - y| across runs):"
    )?;
    for q in &summary.top_miscalibrated_questions {
        writeln!(
            out,
            "  id {:>2}: mean|p-y|={:.3} over {} answers",
            q.question_id,
            q.mean_abs_error(),
            q.answered
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::aggregate_rows;
    use crate::analyzers::types::GradedRow;

    fn row(run: i64, question_id: i64, p_correct: f64, correct: bool) -> GradedRow {
        GradedRow {
            run,
            question_id,
            p_correct,
            correct,
        }
    }

    fn render(stats: &LoadStats, summary: &CalibrationSummary) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, stats, summary).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_log_json_does_not_panic() {
        let summary = aggregate_rows(&[row(1, 1, 0.5, true)], 0.25, 10);
        log_json(&summary).unwrap();
    }

    #[test]
    fn test_report_two_row_pool() {
        let rows = vec![row(1, 1, 0.9, true), row(1, 2, 0.1, false)];
        let summary = aggregate_rows(&rows, 0.25, 10);
        let stats = LoadStats {
            ok: 2,
            ..Default::default()
        };

        let expected = "\
OK rows: 2  (other parse stats: none)
Pooled accuracy: 0.5000
Pooled Brier:    0.010000

Calibration buckets (pooled):
  [0.25,0.5): n=0
  [0.5,0.75): n=0
  [0.75,1]: n=1  mean_p=0.900  acc=1.000  gap(acc-mean_p)=+0.100
  (outside these buckets): n=1

Irrational (p < 0.25) by run:
  run   1:   1/2 (50.000%)

Top 10 runs with most irrational answers:
  run   1: 1/2 (50.000%)

Top 10 question IDs with most irrational answers:
  id  2: 1/1 (100.000%)

Top 10 most miscalibrated question IDs (mean |p - y| across runs):
  id  2: mean|p-y|=0.100 over 1 answers
  id  1: mean|p-y|=0.100 over 1 answers
";
        assert_eq!(render(&stats, &summary), expected);
    }

    #[test]
    fn test_report_tally_lists_nonzero_reasons() {
        let summary = aggregate_rows(&[row(1, 1, 0.5, true)], 0.25, 10);
        let stats = LoadStats {
            ok: 1,
            bad_json: 2,
            no_key: 1,
            ..Default::default()
        };

        let text = render(&stats, &summary);
        assert!(text.starts_with("OK rows: 1  (other parse stats: bad_json=2, no_key=1)\n"));
    }

    #[test]
    fn test_report_without_irrational_rows() {
        let summary = aggregate_rows(&[row(3, 1, 0.6, true)], 0.25, 5);
        let text = render(&LoadStats::default(), &summary);

        assert!(text.contains("Top 5 runs with most irrational answers:\n  (none)\n"));
        assert!(text.contains("Top 5 question IDs with most irrational answers:\n  (none)\n"));
        assert!(!text.contains("outside these buckets"));
        assert!(text.contains("  run   3:   0/1 (0.000%)\n"));
    }

    #[test]
    fn test_format_threshold() {
        assert_eq!(format_threshold(0.25), "0.25");
        assert_eq!(format_threshold(1.0), "1.0");
        assert_eq!(format_threshold(0.0001), "0.0001");
        assert_eq!(format_threshold(1e-5), "1e-05");
        assert_eq!(format_threshold(1.5e-7), "1.5e-07");
        assert_eq!(format_threshold(1e20), "1e+20");
    }

    #[test]
    fn test_report_whole_threshold_keeps_fraction() {
        let summary = aggregate_rows(&[row(1, 1, 0.5, true)], 1.0, 10);
        let text = render(&LoadStats::default(), &summary);
        assert!(text.contains("Irrational (p < 1.0) by run:\n"));
    }

    #[test]
    fn test_report_runs_sorted_ascending() {
        let rows = vec![row(12, 1, 0.5, true), row(2, 1, 0.5, true), row(7, 1, 0.5, true)];
        let summary = aggregate_rows(&rows, 0.25, 10);
        let text = render(&LoadStats::default(), &summary);

        let p2 = text.find("run   2:").unwrap();
        let p7 = text.find("run   7:").unwrap();
        let p12 = text.find("run  12:").unwrap();
        assert!(p2 < p7 && p7 < p12);
    }
}
