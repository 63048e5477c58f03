//! Repairs execution timestamps that lost their date component.
//!
//! The ledger exports same-day fills as a bare time of day, which parses onto a
//! sentinel date in the distant past. Any timestamp before the threshold date
//! is moved onto the processing date, keeping its hour, minute and second.

use crate::domain::Execution;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Timestamps strictly before this date are treated as missing their date.
pub const DEFAULT_THRESHOLD: NaiveDate = match NaiveDate::from_ymd_opt(2005, 1, 1) {
    Some(date) => date,
    None => panic!("invalid default threshold"),
};

/// Date correction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFix {
    pub threshold: NaiveDate,
    /// Date substituted into fills that fall before `threshold`.
    pub today: NaiveDate,
}

impl DateFix {
    pub fn new(threshold: NaiveDate, today: NaiveDate) -> Self {
        Self { threshold, today }
    }

    /// Policy using the local current date.
    pub fn for_today(threshold: NaiveDate) -> Self {
        Self::new(threshold, Local::now().date_naive())
    }

    /// Whether `timestamp` falls before the threshold date.
    pub fn needs_fix(&self, timestamp: NaiveDateTime) -> bool {
        timestamp < self.threshold.and_time(NaiveTime::default())
    }

    /// Corrected timestamp. Sub-second precision of repaired values is dropped.
    pub fn apply(&self, timestamp: NaiveDateTime) -> NaiveDateTime {
        if !self.needs_fix(timestamp) {
            return timestamp;
        }
        let time = timestamp.time();
        let time = time.with_nanosecond(0).unwrap_or(time);
        self.today.and_time(time)
    }
}

impl Default for DateFix {
    fn default() -> Self {
        Self::for_today(DEFAULT_THRESHOLD)
    }
}

/// Normalize executions against the local current date and default threshold.
pub fn normalize(executions: Vec<Execution>) -> Vec<Execution> {
    normalize_with(executions, &DateFix::default())
}

/// Normalize executions with an explicit policy. Order and all non-timestamp
/// fields are preserved.
pub fn normalize_with(executions: Vec<Execution>, fix: &DateFix) -> Vec<Execution> {
    let mut repaired = 0usize;
    let normalized: Vec<Execution> = executions
        .into_iter()
        .map(|execution| {
            if fix.needs_fix(execution.timestamp) {
                repaired += 1;
                let timestamp = fix.apply(execution.timestamp);
                execution.with_timestamp(timestamp)
            } else {
                execution
            }
        })
        .collect();

    if repaired > 0 {
        tracing::warn!(
            repaired,
            threshold = %fix.threshold,
            today = %fix.today,
            "Moved date-less executions onto the processing date"
        );
    }

    normalized
}
