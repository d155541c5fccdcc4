//! Zoned Cron - timezone-aware cron schedules
//!
//! Parses 5/6-field cron expressions (with `L`, `kL`, `N-L` day-of-month
//! forms and `wd#k` / `wd#L` ordinal-weekday forms) and computes
//! DST-correct next fire times in an IANA timezone:
//! - leap-year aware "last day of month" resolution
//! - OR-combination of day-of-month and day-of-week constraints
//! - spring-forward gaps skipped, fall-back hours visited twice in order
//! - bounded search that reports logically unsatisfiable schedules
//!
//! ## Quick Start
//!
//! ```
//! use zoned_cron::{CronSchedule, CronTrigger, Trigger};
//! use chrono::TimeZone;
//!
//! // Business hours on weekdays, matched in Moscow local time
//! let schedule = CronSchedule::parse_in("0 9-17 * * MON-FRI", chrono_tz::Europe::Moscow)
//!     .expect("valid expression");
//!
//! let friday_afternoon = chrono_tz::Europe::Moscow
//!     .with_ymd_and_hms(2021, 7, 30, 17, 30, 0)
//!     .unwrap();
//!
//! // Friday 17:30 rolls over the weekend to Monday 09:00
//! let trigger = CronTrigger::new(schedule);
//! let next = trigger.next_run_time(None, friday_afternoon).unwrap();
//! let monday_morning = chrono_tz::Europe::Moscow
//!     .with_ymd_and_hms(2021, 8, 2, 9, 0, 0)
//!     .unwrap();
//! assert_eq!(next, monday_morning);
//! ```
//!
//! The library performs no I/O, spawns no threads, and carries no state
//! between queries; a built [`CronSchedule`] is immutable and can be
//! queried concurrently.

mod advancer;
mod field;
mod schedule;
mod trigger;
mod types;

pub use advancer::MAX_SEARCH_CYCLES;
pub use field::{DayOfMonth, DayOfWeek};
pub use schedule::{CronSchedule, CronScheduleBuilder, Upcoming};
pub use trigger::{CompositeTrigger, CronTrigger, StaleSkipTrigger, Trigger};
pub use types::{CronError, LastExecution, Result};
