//! Next-fire-time computation
//!
//! Finds the earliest timestamp strictly after a reference instant that
//! satisfies every field of a schedule. Matching runs over local civil time
//! in the schedule's zone as an iterative odometer: units are checked from
//! the coarsest (month) to the finest (second), and whenever a finer unit
//! exhausts its candidates the next coarser unit is carried forward by one
//! and the finer units reset to their field minimums.
//!
//! DST transitions are resolved after a local-time candidate is found:
//! a candidate erased by a spring-forward gap maps to the first
//! representable instant past the gap, and a candidate repeated by a
//! fall-back fold maps to whichever occurrence is chronologically after the
//! reference, so the repeated local hour is visited twice in order.

use crate::schedule::CronSchedule;
use crate::types::{CronError, Result};
use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

/// Upper bound on carry cycles for one search.
///
/// Each pass of the odometer loop (a month jump, a day step, or a
/// unit carry) consumes one cycle. The rarest satisfiable schedules, such
/// as a fixed day restricted to February, resolve within a few tens of
/// cycles per year searched; 1000 cycles therefore spans several decades of
/// calendar before the schedule is declared unsatisfiable.
pub const MAX_SEARCH_CYCLES: usize = 1000;

/// Longest spring-forward gap we are prepared to step across, in minutes.
/// Real zone transitions shift by at most two hours.
const MAX_GAP_MINUTES: i64 = 180;

/// The earliest timestamp strictly after `from` matching every field of
/// `schedule`, with sub-second precision rounded up to the next whole
/// second.
pub(crate) fn next_after(schedule: &CronSchedule, from: &DateTime<Tz>) -> Result<DateTime<Tz>> {
    let zone = schedule.zone();

    // Round up to the next whole second; the result must be strictly after
    // `from` in any case.
    let floor = DateTime::<Utc>::from_timestamp(from.timestamp() + 1, 0)
        .ok_or(CronError::TimeOutOfRange)?
        .with_timezone(&zone);

    let start_local = floor.naive_local();
    let forward = next_local_match(schedule, start_local)?;
    let mut best = resolve_local(&zone, forward, &floor)?;

    // A fall-back fold replays a stretch of local time. If the floor sits in
    // the first pass of the fold, matches whose local time already went by
    // may still be pending in the second pass; rescan the replayed stretch
    // and take their later resolution when it lands before `best`.
    if let LocalResult::Ambiguous(early, late) = zone.from_local_datetime(&start_local) {
        let replay = late - early;
        let mut probe = start_local - replay;
        while probe < start_local {
            let candidate = next_local_match(schedule, probe)?;
            if candidate >= start_local {
                break;
            }
            if let LocalResult::Ambiguous(_, second_pass) = zone.from_local_datetime(&candidate) {
                if second_pass >= floor && second_pass < best {
                    best = second_pass;
                }
            }
            probe = candidate + Duration::seconds(1);
        }
    }

    Ok(best)
}

/// Find the earliest local civil time at or after `start` whose fields all
/// match, ignoring zone transitions. Iterative carry from month down to
/// second; every carry consumes one cycle of the bounded search.
fn next_local_match(schedule: &CronSchedule, start: NaiveDateTime) -> Result<NaiveDateTime> {
    let mut current = start;

    for _ in 0..MAX_SEARCH_CYCLES {
        // Month: jump to the first day of the next valid month, finer units
        // reset, and re-enter the loop from the top.
        let month = current.month();
        if !schedule.months().contains(&month) {
            let (year, next_month) = match schedule.months().range(month + 1..).next() {
                Some(&m) => (current.year(), m),
                None => (
                    current.year() + 1,
                    schedule.months().iter().next().copied().unwrap_or(1),
                ),
            };
            current = first_of_month(year, next_month)?;
            continue;
        }

        // Day: both the plain day number and its position from the end of
        // the month are considered, against the actual month length.
        if !schedule.day_matches(current.date()) {
            let next_day = current.date().succ_opt().ok_or(CronError::TimeOutOfRange)?;
            current = next_day.and_time(NaiveTime::MIN);
            continue;
        }

        // Hour: advance within the set, or carry into the next day.
        let hour = current.hour();
        if !schedule.hours().contains(&hour) {
            match schedule.hours().range(hour + 1..).next() {
                Some(&h) => {
                    current = current
                        .date()
                        .and_hms_opt(h, 0, 0)
                        .ok_or(CronError::TimeOutOfRange)?;
                }
                None => {
                    let next_day = current.date().succ_opt().ok_or(CronError::TimeOutOfRange)?;
                    current = next_day.and_time(NaiveTime::MIN);
                }
            }
            continue;
        }

        // Minute: advance within the set, or carry into the next hour.
        let minute = current.minute();
        if !schedule.minutes().contains(&minute) {
            match schedule.minutes().range(minute + 1..).next() {
                Some(&m) => {
                    current = current
                        .date()
                        .and_hms_opt(hour, m, 0)
                        .ok_or(CronError::TimeOutOfRange)?;
                }
                None => {
                    let hour_start = current
                        .date()
                        .and_hms_opt(hour, 0, 0)
                        .ok_or(CronError::TimeOutOfRange)?;
                    current = hour_start
                        .checked_add_signed(Duration::hours(1))
                        .ok_or(CronError::TimeOutOfRange)?;
                }
            }
            continue;
        }

        // Second: advance within the set, or carry into the next minute.
        let second = current.second();
        if !schedule.seconds().contains(&second) {
            match schedule.seconds().range(second + 1..).next() {
                Some(&s) => {
                    current = current
                        .date()
                        .and_hms_opt(hour, minute, s)
                        .ok_or(CronError::TimeOutOfRange)?;
                }
                None => {
                    let minute_start = current
                        .date()
                        .and_hms_opt(hour, minute, 0)
                        .ok_or(CronError::TimeOutOfRange)?;
                    current = minute_start
                        .checked_add_signed(Duration::minutes(1))
                        .ok_or(CronError::TimeOutOfRange)?;
                }
            }
            continue;
        }

        return Ok(current);
    }

    Err(CronError::Unsatisfiable(format!(
        "no matching time for '{}' within {} search cycles",
        schedule, MAX_SEARCH_CYCLES
    )))
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDateTime> {
    chrono::NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .ok_or(CronError::TimeOutOfRange)
}

/// Map a matched local civil time onto an instant in the zone.
///
/// A time erased by spring-forward resolves to the first representable
/// instant after the gap. A time repeated by fall-back resolves to
/// whichever occurrence is chronologically after `floor`, keeping the
/// search monotonic.
fn resolve_local(zone: &Tz, local: NaiveDateTime, floor: &DateTime<Tz>) -> Result<DateTime<Tz>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(instant) => Ok(instant),
        LocalResult::Ambiguous(early, late) => {
            if early >= *floor {
                Ok(early)
            } else {
                Ok(late)
            }
        }
        LocalResult::None => {
            let mut probe = local;
            for _ in 0..MAX_GAP_MINUTES {
                probe = probe
                    .checked_add_signed(Duration::minutes(1))
                    .ok_or(CronError::TimeOutOfRange)?;
                if let Some(instant) = zone.from_local_datetime(&probe).earliest() {
                    return Ok(instant);
                }
            }
            Err(CronError::TimeOutOfRange)
        }
    }
}
