//! Core types shared across the crate.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for schedule operations
pub type Result<T> = std::result::Result<T, CronError>;

/// Schedule library errors
#[derive(Debug, Error)]
pub enum CronError {
    /// Malformed cron expression (wrong shape, not a field-level problem)
    #[error("Invalid cron expression: {0}")]
    InvalidExpression(String),

    /// A single field failed to parse or validate
    #[error("Invalid {field} field: token '{token}': {reason}")]
    InvalidField {
        /// Which of the six fields was malformed
        field: &'static str,
        /// The offending token as written
        token: String,
        /// Why it was rejected
        reason: String,
    },

    /// Unrecognized IANA timezone identifier
    #[error("Unknown timezone: {0}")]
    UnknownTimeZone(String),

    /// The field combination can never match a real calendar date
    #[error("Schedule never matches: {0}")]
    Unsatisfiable(String),

    /// Date arithmetic left the representable range
    #[error("Timestamp arithmetic out of range")]
    TimeOutOfRange,
}

/// Record of a previous firing, supplied by the external scheduler.
///
/// The core never produces these; it only reads them to pick the reference
/// instant for the next-run-time computation. Instants are stored in UTC and
/// re-zonable to any timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastExecution {
    /// The time this firing was originally scheduled for
    scheduled_start: DateTime<Utc>,

    /// When the task actually began running, if it started
    #[serde(skip_serializing_if = "Option::is_none")]
    run_start: Option<DateTime<Utc>>,

    /// When the task finished, if it completed
    #[serde(skip_serializing_if = "Option::is_none")]
    run_end: Option<DateTime<Utc>>,
}

impl LastExecution {
    /// Create a record for a firing that was scheduled but has not started
    pub fn new(scheduled_start: DateTime<Utc>) -> Self {
        Self {
            scheduled_start,
            run_start: None,
            run_end: None,
        }
    }

    /// Record the actual run start
    pub fn started(mut self, at: DateTime<Utc>) -> Self {
        self.run_start = Some(at);
        self
    }

    /// Record the actual run end
    pub fn ended(mut self, at: DateTime<Utc>) -> Self {
        self.run_end = Some(at);
        self
    }

    /// The originally scheduled start, in the given timezone
    pub fn scheduled_start_in<Tz: TimeZone>(&self, zone: &Tz) -> DateTime<Tz> {
        self.scheduled_start.with_timezone(zone)
    }

    /// The actual run start, in the given timezone
    pub fn run_start_in<Tz: TimeZone>(&self, zone: &Tz) -> Option<DateTime<Tz>> {
        self.run_start.map(|t| t.with_timezone(zone))
    }

    /// The actual run end, in the given timezone
    pub fn run_end_in<Tz: TimeZone>(&self, zone: &Tz) -> Option<DateTime<Tz>> {
        self.run_end.map(|t| t.with_timezone(zone))
    }
}
