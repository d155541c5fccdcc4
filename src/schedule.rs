//! Cron schedule representation
//!
//! A [`CronSchedule`] holds six normalized field-sets plus a timezone. It is
//! produced either by parsing a whole cron string:
//!
//! ```text
//! ┌───────────── second (0-59, optional)
//! │ ┌───────────── minute (0-59)
//! │ │ ┌───────────── hour (0-23)
//! │ │ │ ┌───────────── day of month (1-31, L, kL, N-L)
//! │ │ │ │ ┌───────────── month (1-12 or JAN-DEC)
//! │ │ │ │ │ ┌───────────── day of week (MON-SUN, wd#k, wd#L)
//! │ │ │ │ │ │
//! 0 * * * * *
//! ```
//!
//! or field by field through [`CronScheduleBuilder`]. A 5-field string omits
//! seconds, defaulting them to 0. Once built, a schedule is immutable; all
//! validation happens at construction and never at query time.

use crate::advancer;
use crate::field::{
    month_names, parse_days_of_month, parse_days_of_week, parse_field, validate_days_of_month,
    validate_days_of_week, validate_values, DayOfMonth, DayOfWeek,
};
use crate::types::{CronError, Result};
use chrono::{DateTime, Datelike, NaiveDate, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// An immutable, timezone-aware cron schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronSchedule {
    /// Source expression, kept for display and diagnostics
    expression: String,
    seconds: BTreeSet<u32>,
    minutes: BTreeSet<u32>,
    hours: BTreeSet<u32>,
    days_of_month: BTreeSet<DayOfMonth>,
    /// Day-of-month field was `*`/`?` ("don't care")
    any_day_of_month: bool,
    months: BTreeSet<u32>,
    days_of_week: BTreeSet<DayOfWeek>,
    /// Day-of-week field was `*`/`?` ("don't care")
    any_day_of_week: bool,
    zone: Tz,
}

impl CronSchedule {
    /// Parse a 5- or 6-field cron string in UTC.
    ///
    /// # Examples
    ///
    /// ```
    /// use zoned_cron::CronSchedule;
    ///
    /// // Every 5 minutes
    /// let schedule = CronSchedule::parse("*/5 * * * *").unwrap();
    ///
    /// // Weekdays at 9:00, business-hours style
    /// let schedule = CronSchedule::parse("0 9-17 * * MON-FRI").unwrap();
    ///
    /// // Last day of every month at 00:00:30
    /// let schedule = CronSchedule::parse("30 0 0 L * *").unwrap();
    /// ```
    pub fn parse(expression: &str) -> Result<Self> {
        Self::parse_in(expression, chrono_tz::UTC)
    }

    /// Parse a 5- or 6-field cron string, matching in the given timezone.
    pub fn parse_in(expression: &str, zone: Tz) -> Result<Self> {
        let parts: Vec<&str> = expression.split_whitespace().collect();

        // A 5-field expression omits seconds, which default to 0.
        let (seconds_text, rest) = match parts.len() {
            5 => ("0", &parts[..]),
            6 => (parts[0], &parts[1..]),
            n => {
                return Err(CronError::InvalidExpression(format!(
                    "expected 5 or 6 fields, got {}",
                    n
                )))
            }
        };

        let seconds = parse_field("second", seconds_text, 0, 59, &[])?;
        let minutes = parse_field("minute", rest[0], 0, 59, &[])?;
        let hours = parse_field("hour", rest[1], 0, 23, &[])?;
        let (days_of_month, any_day_of_month) = parse_days_of_month(rest[2])?;
        let months = parse_field("month", rest[3], 1, 12, month_names())?;
        let (days_of_week, any_day_of_week) = parse_days_of_week(rest[4])?;

        Ok(Self {
            expression: expression.to_string(),
            seconds,
            minutes,
            hours,
            days_of_month,
            any_day_of_month,
            months,
            days_of_week,
            any_day_of_week,
            zone,
        })
    }

    /// Start building a schedule field by field.
    pub fn builder() -> CronScheduleBuilder {
        CronScheduleBuilder::default()
    }

    /// The timezone this schedule matches in.
    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// The source cron expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Check whether a timestamp satisfies every field of this schedule.
    /// The timestamp is converted into the schedule's zone first.
    pub fn matches<Z: chrono::TimeZone>(&self, at: &DateTime<Z>) -> bool {
        let local = at.with_timezone(&self.zone);
        self.seconds.contains(&local.second())
            && self.minutes.contains(&local.minute())
            && self.hours.contains(&local.hour())
            && self.months.contains(&local.month())
            && self.day_matches(local.date_naive())
    }

    /// The earliest timestamp strictly after `from` that satisfies every
    /// field, or [`CronError::Unsatisfiable`] if the bounded search finds
    /// none.
    pub fn next_after(&self, from: &DateTime<Tz>) -> Result<DateTime<Tz>> {
        advancer::next_after(self, from)
    }

    /// Iterator over successive fire times strictly after `from`.
    ///
    /// The stream ends permanently once the bounded search fails, whether
    /// the schedule is unsatisfiable or arithmetic left the representable
    /// range; the failing search is not re-run on later calls.
    pub fn upcoming(&self, from: DateTime<Tz>) -> Upcoming<'_> {
        Upcoming {
            schedule: self,
            current: from,
            finished: false,
        }
    }

    /// Day selection uses OR semantics between the day-of-month and
    /// day-of-week fields; a field left as `*`/`?` does not constrain the
    /// day at all.
    pub(crate) fn day_matches(&self, date: NaiveDate) -> bool {
        match (self.any_day_of_month, self.any_day_of_week) {
            (true, true) => true,
            (false, true) => self.day_of_month_matches(date),
            (true, false) => self.day_of_week_matches(date),
            (false, false) => self.day_of_month_matches(date) || self.day_of_week_matches(date),
        }
    }

    fn day_of_month_matches(&self, date: NaiveDate) -> bool {
        self.days_of_month.iter().any(|d| d.matches(date))
    }

    fn day_of_week_matches(&self, date: NaiveDate) -> bool {
        self.days_of_week.iter().any(|d| d.matches(date))
    }

    pub(crate) fn seconds(&self) -> &BTreeSet<u32> {
        &self.seconds
    }

    pub(crate) fn minutes(&self) -> &BTreeSet<u32> {
        &self.minutes
    }

    pub(crate) fn hours(&self) -> &BTreeSet<u32> {
        &self.hours
    }

    pub(crate) fn months(&self) -> &BTreeSet<u32> {
        &self.months
    }

    /// Get a human-readable description of the schedule
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();

        if self.seconds.len() == 1 {
            let sec = self.seconds.iter().next().copied().unwrap_or(0);
            if sec != 0 {
                parts.push(format!("at second {}", sec));
            }
        } else if self.seconds.len() < 60 {
            parts.push(format!("at seconds {:?}", self.seconds));
        }

        if self.minutes.len() == 60 {
            parts.push("every minute".to_string());
        } else if self.minutes.len() == 1 {
            let min = self.minutes.iter().next().copied().unwrap_or(0);
            if min == 0 {
                parts.push("at the start of the hour".to_string());
            } else {
                parts.push(format!("at minute {}", min));
            }
        } else {
            parts.push(format!("at minutes {:?}", self.minutes));
        }

        if self.hours.len() < 24 {
            parts.push(format!("during hours {:?}", self.hours));
        }

        if !self.any_day_of_month {
            let days: Vec<String> = self
                .days_of_month
                .iter()
                .map(|d| match d {
                    DayOfMonth::Day(n) => n.to_string(),
                    DayOfMonth::FromEnd(1) => "last".to_string(),
                    DayOfMonth::FromEnd(k) => format!("{}-from-last", k),
                })
                .collect();
            parts.push(format!("on days [{}]", days.join(", ")));
        }

        if self.months.len() < 12 {
            parts.push(format!("in months {:?}", self.months));
        }

        if !self.any_day_of_week {
            let names: Vec<String> = self
                .days_of_week
                .iter()
                .map(|d| match d {
                    DayOfWeek::Plain(w) => weekday_name(*w).to_string(),
                    DayOfWeek::Nth(w, k) => format!("{}th {}", k, weekday_name(*w)),
                    DayOfWeek::Last(w) => format!("last {}", weekday_name(*w)),
                })
                .collect();
            parts.push(format!("on {}", names.join(", ")));
        }

        parts.push(format!("in zone {}", self.zone));
        parts.join(", ")
    }
}

fn weekday_name(weekday: u32) -> &'static str {
    match weekday {
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        7 => "Sun",
        _ => "?",
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl FromStr for CronSchedule {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self> {
        CronSchedule::parse(s)
    }
}

/// Iterator over successive fire times of a schedule.
///
/// Ends when the schedule becomes unsatisfiable or arithmetic leaves the
/// representable range, and stays ended afterwards.
pub struct Upcoming<'a> {
    schedule: &'a CronSchedule,
    current: DateTime<Tz>,
    finished: bool,
}

impl Iterator for Upcoming<'_> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.schedule.next_after(&self.current) {
            Ok(next) => {
                self.current = next;
                Some(next)
            }
            Err(_) => {
                self.finished = true;
                None
            }
        }
    }
}

/// One field's pending input inside the builder.
#[derive(Debug, Clone)]
enum FieldSource {
    Text(String),
    Values(Vec<i64>),
}

impl FieldSource {
    fn render(&self) -> String {
        match self {
            FieldSource::Text(text) => text.clone(),
            FieldSource::Values(values) => values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Mutable, fluent schedule configuration. Consumed by [`build`], which is
/// the only way to obtain a [`CronSchedule`]; the produced value cannot be
/// mutated afterwards.
///
/// All field validation happens in [`build`], so a misconfigured field is
/// reported at construction and never at query time.
///
/// [`build`]: CronScheduleBuilder::build
///
/// # Examples
///
/// ```
/// use zoned_cron::CronSchedule;
///
/// let schedule = CronSchedule::builder()
///     .hours("9-17")
///     .days_of_week("MON-FRI")
///     .zone(chrono_tz::Europe::Moscow)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct CronScheduleBuilder {
    seconds: Option<FieldSource>,
    minutes: Option<FieldSource>,
    hours: Option<FieldSource>,
    days_of_month: Option<FieldSource>,
    months: Option<FieldSource>,
    days_of_week: Option<FieldSource>,
    zone: Option<Tz>,
    zone_name: Option<String>,
}

impl CronScheduleBuilder {
    /// Set the seconds field from cron text.
    pub fn seconds(mut self, spec: impl Into<String>) -> Self {
        self.seconds = Some(FieldSource::Text(spec.into()));
        self
    }

    /// Set the seconds field from literal values (0-59).
    pub fn seconds_list(mut self, values: &[u32]) -> Self {
        self.seconds = Some(FieldSource::Values(
            values.iter().map(|&v| v as i64).collect(),
        ));
        self
    }

    /// Set the minutes field from cron text.
    pub fn minutes(mut self, spec: impl Into<String>) -> Self {
        self.minutes = Some(FieldSource::Text(spec.into()));
        self
    }

    /// Set the minutes field from literal values (0-59).
    pub fn minutes_list(mut self, values: &[u32]) -> Self {
        self.minutes = Some(FieldSource::Values(
            values.iter().map(|&v| v as i64).collect(),
        ));
        self
    }

    /// Set the hours field from cron text.
    pub fn hours(mut self, spec: impl Into<String>) -> Self {
        self.hours = Some(FieldSource::Text(spec.into()));
        self
    }

    /// Set the hours field from literal values (0-23).
    pub fn hours_list(mut self, values: &[u32]) -> Self {
        self.hours = Some(FieldSource::Values(
            values.iter().map(|&v| v as i64).collect(),
        ));
        self
    }

    /// Set the day-of-month field from cron text (`L` forms included).
    pub fn days_of_month(mut self, spec: impl Into<String>) -> Self {
        self.days_of_month = Some(FieldSource::Text(spec.into()));
        self
    }

    /// Set the day-of-month field from literal values in the compact
    /// integer encoding: 1-31, or -1..-31 counting from the end of the
    /// month (-1 is the last day).
    pub fn days_of_month_list(mut self, values: &[i32]) -> Self {
        self.days_of_month = Some(FieldSource::Values(
            values.iter().map(|&v| v as i64).collect(),
        ));
        self
    }

    /// Set the month field from cron text (numbers or names).
    pub fn months(mut self, spec: impl Into<String>) -> Self {
        self.months = Some(FieldSource::Text(spec.into()));
        self
    }

    /// Set the month field from literal values (1-12).
    pub fn months_list(mut self, values: &[u32]) -> Self {
        self.months = Some(FieldSource::Values(
            values.iter().map(|&v| v as i64).collect(),
        ));
        self
    }

    /// Set the day-of-week field from cron text (`#` forms included).
    pub fn days_of_week(mut self, spec: impl Into<String>) -> Self {
        self.days_of_week = Some(FieldSource::Text(spec.into()));
        self
    }

    /// Set the day-of-week field from literal values in the extended
    /// integer encoding: 1-7 plain weekdays (0 is a Sunday alias),
    /// `7k + d` for the k-th occurrence, `42 + d` for the last occurrence.
    pub fn days_of_week_list(mut self, values: &[u32]) -> Self {
        self.days_of_week = Some(FieldSource::Values(
            values.iter().map(|&v| v as i64).collect(),
        ));
        self
    }

    /// Set the timezone the schedule matches in.
    pub fn zone(mut self, zone: Tz) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Set the timezone by IANA name; resolution happens in `build`.
    pub fn zone_name(mut self, name: impl Into<String>) -> Self {
        self.zone_name = Some(name.into());
        self
    }

    /// Validate every configured field and produce the immutable schedule.
    /// Unset fields default to all values; unset day fields are "don't
    /// care"; the zone defaults to UTC.
    pub fn build(self) -> Result<CronSchedule> {
        let zone = match (self.zone, &self.zone_name) {
            (Some(zone), _) => zone,
            (None, Some(name)) => name
                .parse::<Tz>()
                .map_err(|_| CronError::UnknownTimeZone(name.clone()))?,
            (None, None) => chrono_tz::UTC,
        };

        let seconds = match &self.seconds {
            Some(FieldSource::Text(text)) => parse_field("second", text, 0, 59, &[])?,
            Some(FieldSource::Values(values)) => validate_values("second", values, 0, 59)?,
            None => (0..=59).collect(),
        };
        let minutes = match &self.minutes {
            Some(FieldSource::Text(text)) => parse_field("minute", text, 0, 59, &[])?,
            Some(FieldSource::Values(values)) => validate_values("minute", values, 0, 59)?,
            None => (0..=59).collect(),
        };
        let hours = match &self.hours {
            Some(FieldSource::Text(text)) => parse_field("hour", text, 0, 23, &[])?,
            Some(FieldSource::Values(values)) => validate_values("hour", values, 0, 23)?,
            None => (0..=23).collect(),
        };
        let (days_of_month, any_day_of_month) = match &self.days_of_month {
            Some(FieldSource::Text(text)) => parse_days_of_month(text)?,
            Some(FieldSource::Values(values)) => {
                let narrowed: Vec<i32> = values.iter().map(|&v| v as i32).collect();
                validate_days_of_month(&narrowed)?
            }
            None => ((1..=31).map(DayOfMonth::Day).collect(), true),
        };
        let months = match &self.months {
            Some(FieldSource::Text(text)) => parse_field("month", text, 1, 12, month_names())?,
            Some(FieldSource::Values(values)) => validate_values("month", values, 1, 12)?,
            None => (1..=12).collect(),
        };
        let (days_of_week, any_day_of_week) = match &self.days_of_week {
            Some(FieldSource::Text(text)) => parse_days_of_week(text)?,
            Some(FieldSource::Values(values)) => {
                let narrowed: Vec<u32> = values
                    .iter()
                    .map(|&v| {
                        u32::try_from(v).map_err(|_| CronError::InvalidField {
                            field: "day-of-week",
                            token: v.to_string(),
                            reason: "must be within the extended range 0..=49".to_string(),
                        })
                    })
                    .collect::<Result<_>>()?;
                validate_days_of_week(&narrowed)?
            }
            None => ((1..=7).map(DayOfWeek::Plain).collect(), true),
        };

        let expression = format!(
            "{} {} {} {} {} {}",
            self.seconds.as_ref().map_or("*".to_string(), |s| s.render()),
            self.minutes.as_ref().map_or("*".to_string(), |s| s.render()),
            self.hours.as_ref().map_or("*".to_string(), |s| s.render()),
            self.days_of_month
                .as_ref()
                .map_or("*".to_string(), |s| s.render()),
            self.months.as_ref().map_or("*".to_string(), |s| s.render()),
            self.days_of_week
                .as_ref()
                .map_or("*".to_string(), |s| s.render()),
        );

        Ok(CronSchedule {
            expression,
            seconds,
            minutes,
            hours,
            days_of_month,
            any_day_of_month,
            months,
            days_of_week,
            any_day_of_week,
            zone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[test]
    fn test_parse_five_fields_defaults_seconds_to_zero() {
        let schedule = CronSchedule::parse("* * * * *").unwrap();
        assert_eq!(schedule.seconds(), &BTreeSet::from([0]));
        assert_eq!(schedule.minutes().len(), 60);
        assert_eq!(schedule.hours().len(), 24);
        assert_eq!(schedule.months().len(), 12);
    }

    #[test]
    fn test_parse_six_fields() {
        let schedule = CronSchedule::parse("30 0 2 * * *").unwrap();
        assert_eq!(schedule.seconds(), &BTreeSet::from([30]));
        assert_eq!(schedule.minutes(), &BTreeSet::from([0]));
        assert_eq!(schedule.hours(), &BTreeSet::from([2]));
    }

    #[test]
    fn test_parse_invalid_field_count() {
        assert!(matches!(
            CronSchedule::parse("* * *"),
            Err(CronError::InvalidExpression(_))
        ));
        assert!(CronSchedule::parse("* * * * * * *").is_err());
    }

    #[test]
    fn test_parse_reports_offending_field() {
        let err = CronSchedule::parse("61 * * * *").unwrap_err();
        match err {
            CronError::InvalidField { field, token, .. } => {
                assert_eq!(field, "minute");
                assert_eq!(token, "61");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_matches_converts_into_schedule_zone() {
        let schedule = CronSchedule::parse_in("0 0 9 * * *", chrono_tz::Europe::Moscow).unwrap();
        // 06:00 UTC is 09:00 in Moscow
        let utc = chrono::Utc.with_ymd_and_hms(2021, 7, 30, 6, 0, 0).unwrap();
        assert!(schedule.matches(&utc));
        let off = chrono::Utc.with_ymd_and_hms(2021, 7, 30, 9, 0, 0).unwrap();
        assert!(!schedule.matches(&off));
    }

    #[test]
    fn test_day_or_semantics_both_restricted() {
        // Day 15 OR any Monday
        let schedule = CronSchedule::parse("0 0 15 * MON").unwrap();
        // 2021-07-15 is a Thursday, but the 15th matches regardless
        assert!(schedule.day_matches(NaiveDate::from_ymd_opt(2021, 7, 15).unwrap()));
        // 2021-07-19 is a Monday, not the 15th
        assert!(schedule.day_matches(NaiveDate::from_ymd_opt(2021, 7, 19).unwrap()));
        // 2021-07-20 is a Tuesday, not the 15th
        assert!(!schedule.day_matches(NaiveDate::from_ymd_opt(2021, 7, 20).unwrap()));
    }

    #[test]
    fn test_day_wildcards_degrade_to_every_day() {
        let schedule = CronSchedule::parse("0 0 * * *").unwrap();
        for day in 1..=31 {
            assert!(schedule.day_matches(NaiveDate::from_ymd_opt(2021, 7, day).unwrap()));
        }
    }

    #[test]
    fn test_day_single_restricted_field_constrains_alone() {
        // Only day-of-week restricted: Mondays only
        let schedule = CronSchedule::parse("0 0 * * MON").unwrap();
        assert!(schedule.day_matches(NaiveDate::from_ymd_opt(2021, 7, 19).unwrap()));
        assert!(!schedule.day_matches(NaiveDate::from_ymd_opt(2021, 7, 15).unwrap()));

        // Only day-of-month restricted: the 15th only
        let schedule = CronSchedule::parse("0 0 15 * *").unwrap();
        assert!(schedule.day_matches(NaiveDate::from_ymd_opt(2021, 7, 15).unwrap()));
        assert!(!schedule.day_matches(NaiveDate::from_ymd_opt(2021, 7, 19).unwrap()));
    }

    #[test]
    fn test_builder_defaults() {
        let schedule = CronSchedule::builder().build().unwrap();
        assert_eq!(schedule.zone(), chrono_tz::UTC);
        assert_eq!(schedule.seconds().len(), 60);
        assert!(schedule.any_day_of_month);
        assert!(schedule.any_day_of_week);
    }

    #[test]
    fn test_builder_field_setters() {
        let schedule = CronSchedule::builder()
            .seconds_list(&[0])
            .minutes_list(&[0, 30])
            .hours("9-17")
            .days_of_week("MON-FRI")
            .zone(chrono_tz::Europe::Moscow)
            .build()
            .unwrap();

        assert_eq!(schedule.minutes(), &BTreeSet::from([0, 30]));
        assert_eq!(schedule.hours().len(), 9);
        assert_eq!(schedule.zone(), chrono_tz::Europe::Moscow);
        assert!(schedule.any_day_of_month);
        assert!(!schedule.any_day_of_week);
    }

    #[test]
    fn test_builder_literal_day_sentinels() {
        let schedule = CronSchedule::builder()
            .days_of_month_list(&[-1, 15])
            .build()
            .unwrap();
        assert!(schedule.day_matches(NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()));
        assert!(schedule.day_matches(NaiveDate::from_ymd_opt(2023, 2, 15).unwrap()));
        assert!(!schedule.day_matches(NaiveDate::from_ymd_opt(2023, 2, 27).unwrap()));
    }

    #[test]
    fn test_builder_extended_weekday_encoding() {
        // 16 = second Tuesday, 44 = last Tuesday
        let schedule = CronSchedule::builder()
            .days_of_week_list(&[16])
            .build()
            .unwrap();
        assert!(schedule.day_matches(NaiveDate::from_ymd_opt(2021, 4, 13).unwrap()));
        assert!(!schedule.day_matches(NaiveDate::from_ymd_opt(2021, 4, 20).unwrap()));
    }

    #[test]
    fn test_builder_unknown_zone_name() {
        let err = CronSchedule::builder()
            .zone_name("Not/Real")
            .build()
            .unwrap_err();
        assert!(matches!(err, CronError::UnknownTimeZone(_)));
    }

    #[test]
    fn test_builder_rejects_bad_field_at_build() {
        let err = CronSchedule::builder().hours("25").build().unwrap_err();
        match err {
            CronError::InvalidField { field, .. } => assert_eq!(field, "hour"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_display_round_trips_expression() {
        let schedule = CronSchedule::parse("0 9-17 * * MON-FRI").unwrap();
        assert_eq!(schedule.to_string(), "0 9-17 * * MON-FRI");

        let parsed: CronSchedule = "*/5 * * * *".parse().unwrap();
        assert_eq!(parsed.to_string(), "*/5 * * * *");
    }

    #[test]
    fn test_describe() {
        let schedule = CronSchedule::parse("0 9 * * MON-FRI").unwrap();
        let description = schedule.describe();
        assert!(description.contains("Mon"));
        assert!(description.contains("Fri"));
        assert!(description.contains("UTC"));
    }

    #[test]
    fn test_describe_elides_full_seconds_set() {
        let schedule = CronSchedule::parse("* * * * * *").unwrap();
        assert!(!schedule.describe().contains("second"));

        let schedule = CronSchedule::builder().build().unwrap();
        assert!(!schedule.describe().contains("second"));
    }

    #[test]
    fn test_upcoming_ends_permanently_on_unsatisfiable() {
        let schedule = CronSchedule::parse("0 0 0 30 FEB *").unwrap();
        let from = chrono_tz::UTC.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let mut upcoming = schedule.upcoming(from);
        assert!(upcoming.next().is_none());
        assert!(upcoming.next().is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let schedule = CronSchedule::parse_in("0 0 12 L * *", chrono_tz::Europe::Moscow).unwrap();
        let json = serde_json::to_string(&schedule).unwrap();
        let back: CronSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back.zone(), chrono_tz::Europe::Moscow);
        assert_eq!(back.expression(), schedule.expression());
        assert!(back.day_matches(NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()));
    }
}
