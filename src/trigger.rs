//! Trigger facade
//!
//! The two-method contract the external scheduler consumes: compute the
//! next wake-up point from optional last-execution info, and decide whether
//! a particular occurrence should be suppressed without altering the
//! schedule. Every query is a pure function of the immutable schedule and
//! the reference instant; triggers carry no state between calls and are
//! safe to query concurrently.

use crate::schedule::CronSchedule;
use crate::types::{CronError, LastExecution, Result};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// Something that can tell the scheduler when to fire next.
pub trait Trigger {
    /// The next time the task should run, strictly after the reference.
    ///
    /// Without last-execution info the reference is `scheduled_at`;
    /// otherwise it is the recorded run end, falling back to `scheduled_at`
    /// when the last run never completed.
    fn next_run_time(
        &self,
        last: Option<&LastExecution>,
        scheduled_at: DateTime<Tz>,
    ) -> Result<DateTime<Tz>>;

    /// Whether this particular occurrence should be suppressed. Called by
    /// the scheduler immediately before invoking the task. The default
    /// policy never skips.
    fn skip_run(&self, _last: Option<&LastExecution>, _scheduled_run_time: DateTime<Tz>) -> bool {
        false
    }
}

/// The standard trigger: a cron schedule queried through the two-method
/// contract.
#[derive(Debug, Clone)]
pub struct CronTrigger {
    schedule: CronSchedule,
}

impl CronTrigger {
    pub fn new(schedule: CronSchedule) -> Self {
        Self { schedule }
    }

    /// Convenience constructor: parse a cron string in the given zone.
    pub fn from_expression(expression: &str, zone: Tz) -> Result<Self> {
        Ok(Self::new(CronSchedule::parse_in(expression, zone)?))
    }

    pub fn schedule(&self) -> &CronSchedule {
        &self.schedule
    }
}

impl Trigger for CronTrigger {
    fn next_run_time(
        &self,
        last: Option<&LastExecution>,
        scheduled_at: DateTime<Tz>,
    ) -> Result<DateTime<Tz>> {
        let zone = self.schedule.zone();
        let reference = match last.and_then(|l| l.run_end_in(&zone)) {
            Some(run_end) => run_end,
            None => scheduled_at.with_timezone(&zone),
        };

        match self.schedule.next_after(&reference) {
            Ok(next) => {
                tracing::debug!(schedule = %self.schedule, %next, "computed next run time");
                Ok(next)
            }
            Err(err) => {
                tracing::warn!(schedule = %self.schedule, %err, "next run time computation failed");
                Err(err)
            }
        }
    }
}

/// Combines independent triggers by taking the chronologically earliest
/// next run time. A stateless, pure reduction; components do not interact.
pub struct CompositeTrigger {
    triggers: Vec<Box<dyn Trigger + Send + Sync>>,
}

impl CompositeTrigger {
    pub fn new(triggers: Vec<Box<dyn Trigger + Send + Sync>>) -> Self {
        Self { triggers }
    }
}

impl Trigger for CompositeTrigger {
    fn next_run_time(
        &self,
        last: Option<&LastExecution>,
        scheduled_at: DateTime<Tz>,
    ) -> Result<DateTime<Tz>> {
        let mut earliest: Option<DateTime<Tz>> = None;
        for trigger in &self.triggers {
            let next = trigger.next_run_time(last, scheduled_at)?;
            earliest = Some(match earliest {
                Some(current) if current <= next => current,
                _ => next,
            });
        }
        earliest.ok_or_else(|| {
            CronError::Unsatisfiable("composite trigger has no components".to_string())
        })
    }
}

/// A trigger that suppresses occurrences which have fallen too far behind
/// wall-clock time to be worth running late.
#[derive(Debug, Clone)]
pub struct StaleSkipTrigger {
    inner: CronTrigger,
    max_lateness: Duration,
}

impl StaleSkipTrigger {
    pub fn new(inner: CronTrigger, max_lateness: Duration) -> Self {
        Self {
            inner,
            max_lateness,
        }
    }
}

impl Trigger for StaleSkipTrigger {
    fn next_run_time(
        &self,
        last: Option<&LastExecution>,
        scheduled_at: DateTime<Tz>,
    ) -> Result<DateTime<Tz>> {
        self.inner.next_run_time(last, scheduled_at)
    }

    fn skip_run(&self, _last: Option<&LastExecution>, scheduled_run_time: DateTime<Tz>) -> bool {
        let lateness = Utc::now().signed_duration_since(scheduled_run_time.with_timezone(&Utc));
        let skip = lateness > self.max_lateness;
        if skip {
            tracing::debug!(%scheduled_run_time, "skipping stale occurrence");
        }
        skip
    }
}
