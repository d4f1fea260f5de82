use serde::Serialize;
use std::fmt;

/// Why an answer line was not turned into a graded row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    BadJson,
    ParseError,
    BadFields,
    BadValue,
    NoKey,
}

impl RejectReason {
    /// Report order.
    pub const ALL: [RejectReason; 5] = [
        RejectReason::BadJson,
        RejectReason::ParseError,
        RejectReason::BadFields,
        RejectReason::BadValue,
        RejectReason::NoKey,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::BadJson => "bad_json",
            RejectReason::ParseError => "parse_error_lines",
            RejectReason::BadFields => "bad_fields",
            RejectReason::BadValue => "bad_value",
            RejectReason::NoKey => "no_key",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-reason tally of the answers file, one counter per outcome.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub ok: usize,

    // rejections
    pub bad_json: usize,
    pub parse_error_lines: usize,
    pub bad_fields: usize,
    pub bad_value: usize,
    pub no_key: usize,
}

impl LoadStats {
    pub fn record_ok(&mut self) {
        self.ok += 1;
    }

    pub fn record_reject(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::BadJson => self.bad_json += 1,
            RejectReason::ParseError => self.parse_error_lines += 1,
            RejectReason::BadFields => self.bad_fields += 1,
            RejectReason::BadValue => self.bad_value += 1,
            RejectReason::NoKey => self.no_key += 1,
        }
    }

    pub fn count(&self, reason: RejectReason) -> usize {
        match reason {
            RejectReason::BadJson => self.bad_json,
            RejectReason::ParseError => self.parse_error_lines,
            RejectReason::BadFields => self.bad_fields,
            RejectReason::BadValue => self.bad_value,
            RejectReason::NoKey => self.no_key,
        }
    }

    pub fn rejected(&self) -> usize {
        RejectReason::ALL.iter().map(|r| self.count(*r)).sum()
    }

    /// Nonzero rejection counters in report order.
    pub fn nonzero_rejections(&self) -> Vec<(RejectReason, usize)> {
        RejectReason::ALL
            .iter()
            .map(|r| (*r, self.count(*r)))
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ok={}", self.ok)?;
        for reason in RejectReason::ALL {
            write!(f, ", {}={}", reason, self.count(reason))?;
        }
        Ok(())
    }
}
