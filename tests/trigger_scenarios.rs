//! End-to-end trigger scenarios across timezones, DST transitions, and
//! calendar edge cases.

use chrono::{Datelike, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use zoned_cron::{
    CompositeTrigger, CronError, CronSchedule, CronTrigger, LastExecution, Trigger,
};

fn at(zone: Tz, y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::DateTime<Tz> {
    zone.with_ymd_and_hms(y, mo, d, h, mi, s)
        .single()
        .expect("unambiguous local time")
}

#[test]
fn business_hours_skip_the_weekend() {
    let zone = chrono_tz::Europe::Moscow;
    let trigger = CronTrigger::from_expression("0 9-17 * * MON-FRI", zone).expect("valid");

    // Friday 2021-07-30, mid-afternoon
    let mut current = at(zone, 2021, 7, 30, 14, 30, 0);

    let mut fired = Vec::new();
    for _ in 0..5 {
        current = trigger.next_run_time(None, current).unwrap();
        fired.push((current.day(), current.hour()));
    }

    // Three more slots on Friday, then Monday morning
    assert_eq!(fired, vec![(30, 15), (30, 16), (30, 17), (2, 9), (2, 10)]);
    assert_eq!(current.month(), 8);
    assert_eq!(current.weekday(), chrono::Weekday::Mon);
}

#[test]
fn last_execution_end_is_the_reference() {
    let zone = chrono_tz::Europe::Moscow;
    let trigger = CronTrigger::from_expression("0 9-17 * * MON-FRI", zone).expect("valid");

    let scheduled = at(zone, 2021, 7, 30, 15, 0, 0);
    let last = LastExecution::new(scheduled.with_timezone(&Utc))
        .started(scheduled.with_timezone(&Utc))
        .ended(at(zone, 2021, 7, 30, 15, 45, 0).with_timezone(&Utc));

    // 15:45 end time still lands in the 16:00 slot
    let next = trigger.next_run_time(Some(&last), scheduled).unwrap();
    assert_eq!(next, at(zone, 2021, 7, 30, 16, 0, 0));

    // A run that never completed falls back to the scheduled time
    let unfinished = LastExecution::new(scheduled.with_timezone(&Utc));
    let next = trigger.next_run_time(Some(&unfinished), scheduled).unwrap();
    assert_eq!(next, at(zone, 2021, 7, 30, 16, 0, 0));
}

#[test]
fn fall_back_hour_fires_twice_in_anchorage() {
    // DST ended 2021-11-07 02:00 in America/Anchorage; local 01:00 repeats.
    let zone = chrono_tz::America::Anchorage;
    let trigger = CronTrigger::from_expression("0 0 23-4 * * *", zone).expect("valid");

    let mut current = at(zone, 2021, 11, 6, 17, 30, 0);
    let mut sequence = Vec::new();
    for _ in 0..7 {
        current = trigger.next_run_time(None, current).unwrap();
        sequence.push(current.with_timezone(&Utc));
    }

    let expected: Vec<_> = [7, 8, 9, 10, 11, 12, 13]
        .into_iter()
        .map(|h| Utc.with_ymd_and_hms(2021, 11, 7, h, 0, 0).unwrap())
        .collect();
    assert_eq!(sequence, expected, "every hour fires exactly once in UTC");

    // Local rendering: 23, 0, 1 (DST), 1 (standard), 2, 3, 4
    let local_hours: Vec<u32> = expected
        .iter()
        .map(|t| t.with_timezone(&zone).hour())
        .collect();
    assert_eq!(local_hours, vec![23, 0, 1, 1, 2, 3, 4]);
}

#[test]
fn last_day_of_february_tracks_leap_years() {
    let trigger = CronTrigger::from_expression("0 0 0 L FEB *", chrono_tz::UTC).expect("valid");

    let next = trigger
        .next_run_time(None, at(chrono_tz::UTC, 2023, 2, 2, 0, 0, 0))
        .unwrap();
    assert_eq!(next.date_naive().to_string(), "2023-02-28");

    let next = trigger.next_run_time(None, next).unwrap();
    assert_eq!(next.date_naive().to_string(), "2024-02-29");
}

#[test]
fn range_to_last_day_in_february() {
    let trigger = CronTrigger::from_expression("0 0 0 27-L FEB *", chrono_tz::UTC).expect("valid");

    let mut current = at(chrono_tz::UTC, 2023, 2, 2, 0, 0, 0);
    let mut days = Vec::new();
    for _ in 0..3 {
        current = trigger.next_run_time(None, current).unwrap();
        days.push((current.year(), current.month(), current.day()));
    }
    assert_eq!(days, vec![(2023, 2, 27), (2023, 2, 28), (2024, 2, 27)]);
}

#[test]
fn second_tuesday_of_april() {
    let trigger =
        CronTrigger::from_expression("0 0 12 * APR TUE#2", chrono_tz::UTC).expect("valid");

    let next = trigger
        .next_run_time(None, at(chrono_tz::UTC, 2021, 4, 1, 0, 0, 0))
        .unwrap();
    assert_eq!(next.date_naive().to_string(), "2021-04-13");

    // No other April day matches
    let next = trigger.next_run_time(None, next).unwrap();
    assert_eq!(next.date_naive().to_string(), "2022-04-12");
}

#[test]
fn unsatisfiable_schedule_is_a_fatal_error() {
    let trigger = CronTrigger::from_expression("0 0 0 30 FEB *", chrono_tz::UTC).expect("valid");

    let result = trigger.next_run_time(None, at(chrono_tz::UTC, 2023, 1, 1, 0, 0, 0));
    assert!(matches!(result, Err(CronError::Unsatisfiable(_))));
}

#[test]
fn composite_pay_days() {
    // The 15th and the last day of the month, noon UTC
    let fifteenth = CronTrigger::from_expression("0 0 12 15 * *", chrono_tz::UTC).expect("valid");
    let month_end = CronTrigger::from_expression("0 0 12 L * *", chrono_tz::UTC).expect("valid");
    let composite = CompositeTrigger::new(vec![Box::new(fifteenth), Box::new(month_end)]);

    let mut current = at(chrono_tz::UTC, 2024, 1, 20, 0, 0, 0);
    let mut days = Vec::new();
    for _ in 0..4 {
        current = composite.next_run_time(None, current).unwrap();
        days.push((current.month(), current.day()));
    }
    assert_eq!(days, vec![(1, 31), (2, 15), (2, 29), (3, 15)]);
}

#[test]
fn repeated_querying_is_strictly_monotonic() {
    let zone = chrono_tz::America::New_York;
    let schedule = CronSchedule::parse_in("0 0 * * * *", zone).expect("valid");
    let trigger = CronTrigger::new(schedule);

    // Crosses the 2021-03-14 spring-forward transition
    let mut current = at(zone, 2021, 3, 13, 22, 0, 0);
    let mut previous_utc = current.with_timezone(&Utc);
    let mut local_hours = Vec::new();

    for _ in 0..8 {
        current = trigger.next_run_time(None, current).unwrap();
        let utc = current.with_timezone(&Utc);
        assert!(utc > previous_utc);
        assert_eq!(utc - previous_utc, chrono::Duration::hours(1));
        previous_utc = utc;
        local_hours.push(current.hour());
    }

    // 02:00 local does not exist on the 14th
    assert_eq!(local_hours, vec![23, 0, 1, 3, 4, 5, 6, 7]);
}

#[test]
fn all_wildcard_schedule_fires_every_second() {
    let schedule = CronSchedule::parse("* * * * * *").expect("valid");
    let from = at(chrono_tz::UTC, 2021, 7, 30, 12, 0, 0);
    let ticks: Vec<_> = schedule.upcoming(from).take(3).collect();
    assert_eq!(ticks[0], at(chrono_tz::UTC, 2021, 7, 30, 12, 0, 1));
    assert_eq!(ticks[2], at(chrono_tz::UTC, 2021, 7, 30, 12, 0, 3));
}
