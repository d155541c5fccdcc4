//! Cron field parsing
//!
//! Converts a single textual or literal cron field into a normalized,
//! sorted, duplicate-free set of values.
//!
//! Grammar per comma-separated token:
//! - `*` or `?` - all values
//! - `N` - single literal
//! - `N-M` - inclusive range; wraps around the domain when `M < N`
//!   (e.g. `OCT-MAY` is October through May)
//! - `N/K` - starting at `N` (or at the domain minimum for `*/K`),
//!   step by `K` up to the maximum
//! - month and weekday names, case-insensitive, full or 3-letter forms
//! - day-of-month: `L` (last day), `kL` (k-th from last), `N-L`
//! - day-of-week: `wd#k` (k-th occurrence in the month), `wd#L` (last
//!   occurrence); `0` and `7` both mean Sunday

use crate::types::{CronError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const MONTH_NAMES: [(&str, u32); 12] = [
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

const WEEKDAY_NAMES: [(&str, u32); 7] = [
    ("monday", 1),
    ("tuesday", 2),
    ("wednesday", 3),
    ("thursday", 4),
    ("friday", 5),
    ("saturday", 6),
    ("sunday", 7),
];

/// A single day-of-month constraint.
///
/// The compact integer encoding (positive day numbers, negative
/// counted-from-the-end sentinels) only exists at the API boundary; see
/// [`DayOfMonth::from_encoded`] and [`DayOfMonth::encoded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfMonth {
    /// A plain day number, 1-31
    Day(u32),
    /// The k-th day counted from the end of the month; `FromEnd(1)` is the
    /// last day
    FromEnd(u32),
}

impl DayOfMonth {
    /// Decode the integer form: `1..=31` is a plain day, `-1..=-31` counts
    /// from the end of the month.
    pub fn from_encoded(value: i32) -> Result<Self> {
        match value {
            1..=31 => Ok(DayOfMonth::Day(value as u32)),
            -31..=-1 => Ok(DayOfMonth::FromEnd(-value as u32)),
            _ => Err(CronError::InvalidField {
                field: "day-of-month",
                token: value.to_string(),
                reason: "must be 1..=31 or -31..=-1".to_string(),
            }),
        }
    }

    /// The compact integer form of this constraint.
    pub fn encoded(&self) -> i32 {
        match self {
            DayOfMonth::Day(n) => *n as i32,
            DayOfMonth::FromEnd(k) => -(*k as i32),
        }
    }

    /// Whether the given date satisfies this constraint, accounting for the
    /// actual length of its month.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            DayOfMonth::Day(n) => date.day() == *n,
            DayOfMonth::FromEnd(k) => {
                let last = days_in_month(date.year(), date.month());
                *k <= last && date.day() == last + 1 - *k
            }
        }
    }
}

/// A single day-of-week constraint. Weekdays are numbered 1=Monday through
/// 7=Sunday.
///
/// The extended integer encoding (`7k + d` for the k-th occurrence,
/// `42 + d` for the last occurrence) only exists at the API boundary; see
/// [`DayOfWeek::from_encoded`] and [`DayOfWeek::encoded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfWeek {
    /// Any occurrence of the weekday
    Plain(u32),
    /// The k-th occurrence of the weekday in the month, k in 1-5
    Nth(u32, u32),
    /// The last occurrence of the weekday in the month
    Last(u32),
}

impl DayOfWeek {
    /// Decode the extended integer form: `1..=7` is a plain weekday (`0` is
    /// accepted as a Sunday alias), `7k + d` for `k` in 1..=5 is the k-th
    /// occurrence of weekday `d`, and `42 + d` is the last occurrence.
    pub fn from_encoded(value: u32) -> Result<Self> {
        match value {
            0 => Ok(DayOfWeek::Plain(7)),
            1..=7 => Ok(DayOfWeek::Plain(value)),
            8..=42 if value % 7 != 0 => Ok(DayOfWeek::Nth(value % 7, value / 7)),
            14 | 21 | 28 | 35 | 42 => Ok(DayOfWeek::Nth(7, value / 7 - 1)),
            43..=49 => Ok(DayOfWeek::Last(value - 42)),
            _ => Err(CronError::InvalidField {
                field: "day-of-week",
                token: value.to_string(),
                reason: "must be within the extended range 0..=49".to_string(),
            }),
        }
    }

    /// The extended integer form of this constraint.
    pub fn encoded(&self) -> u32 {
        match self {
            DayOfWeek::Plain(d) => *d,
            DayOfWeek::Nth(d, k) => 7 * k + d,
            DayOfWeek::Last(d) => 42 + d,
        }
    }

    /// Whether the given date satisfies this constraint.
    pub fn matches(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().number_from_monday();
        match self {
            DayOfWeek::Plain(d) => weekday == *d,
            DayOfWeek::Nth(d, k) => weekday == *d && (date.day() - 1) / 7 + 1 == *k,
            DayOfWeek::Last(d) => {
                weekday == *d && date.day() + 7 > days_in_month(date.year(), date.month())
            }
        }
    }
}

/// Number of days in the given month, leap-year aware.
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

fn invalid(field: &'static str, token: &str, reason: impl Into<String>) -> CronError {
    CronError::InvalidField {
        field,
        token: token.to_string(),
        reason: reason.into(),
    }
}

/// Resolve a single value: a numeric literal, or a named month/weekday
/// (full name or 3-letter abbreviation, case-insensitive).
fn resolve_value(
    field: &'static str,
    token: &str,
    min: u32,
    max: u32,
    names: &[(&str, u32)],
) -> Result<u32> {
    if let Ok(value) = token.parse::<u32>() {
        if value < min || value > max {
            return Err(invalid(
                field,
                token,
                format!("value {} out of range ({}-{})", value, min, max),
            ));
        }
        return Ok(value);
    }

    let lower = token.to_ascii_lowercase();
    for (name, value) in names {
        if *name == lower || (lower.len() == 3 && name.starts_with(&lower)) {
            return Ok(*value);
        }
    }

    Err(invalid(field, token, "unrecognized value"))
}

/// Expand one numeric token (`*`, `N`, `N-M`, `N/K`, names) into `out`.
///
/// A range whose end is below its start wraps around the domain, so
/// `50-10/5` over minutes walks 50, 55, 0, 5, 10.
fn expand_token(
    field: &'static str,
    token: &str,
    min: u32,
    max: u32,
    names: &[(&str, u32)],
    out: &mut BTreeSet<u32>,
) -> Result<()> {
    let (range_part, step) = match token.split_once('/') {
        Some((range, step_str)) => {
            let step: u32 = step_str
                .parse()
                .map_err(|_| invalid(field, token, format!("invalid step '{}'", step_str)))?;
            if step == 0 {
                return Err(invalid(field, token, "step cannot be 0"));
            }
            (range, Some(step))
        }
        None => (token, None),
    };

    let (start, end) = if range_part == "*" || range_part == "?" {
        (min, max)
    } else if let Some((start_str, end_str)) = range_part.split_once('-') {
        (
            resolve_value(field, start_str, min, max, names)?,
            resolve_value(field, end_str, min, max, names)?,
        )
    } else {
        let value = resolve_value(field, range_part, min, max, names)?;
        match step {
            // N/K runs from N to the top of the domain
            Some(_) => (value, max),
            None => (value, value),
        }
    };
    let step = step.unwrap_or(1);

    // Walk the (possibly wrapped) range in order, honoring the step.
    let span = max - min + 1;
    let length = if start <= end {
        end - start + 1
    } else {
        span - (start - end) + 1
    };
    let mut offset = 0;
    while offset < length {
        out.insert(min + (start - min + offset) % span);
        offset += step;
    }

    Ok(())
}

/// Parse a plain numeric field into a sorted, duplicate-free value set.
pub(crate) fn parse_field(
    field: &'static str,
    text: &str,
    min: u32,
    max: u32,
    names: &[(&str, u32)],
) -> Result<BTreeSet<u32>> {
    let mut values = BTreeSet::new();

    for token in text.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(invalid(field, text, "empty token"));
        }
        expand_token(field, token, min, max, names, &mut values)?;
    }

    if values.is_empty() {
        return Err(invalid(field, text, "no values"));
    }

    Ok(values)
}

/// Validate a literal value array for a plain numeric field.
pub(crate) fn validate_values(
    field: &'static str,
    values: &[i64],
    min: u32,
    max: u32,
) -> Result<BTreeSet<u32>> {
    let mut out = BTreeSet::new();
    for &value in values {
        if value < min as i64 || value > max as i64 {
            return Err(invalid(
                field,
                &value.to_string(),
                format!("value out of range ({}-{})", min, max),
            ));
        }
        out.insert(value as u32);
    }
    if out.is_empty() {
        return Err(invalid(field, "[]", "no values"));
    }
    Ok(out)
}

/// Parse the day-of-month field. Returns the constraint set and whether the
/// field was an unrestricted wildcard ("don't care").
pub(crate) fn parse_days_of_month(text: &str) -> Result<(BTreeSet<DayOfMonth>, bool)> {
    const FIELD: &str = "day-of-month";

    if text == "*" || text == "?" {
        let all = (1..=31).map(DayOfMonth::Day).collect();
        return Ok((all, true));
    }

    let mut out = BTreeSet::new();
    for token in text.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(invalid(FIELD, text, "empty token"));
        }

        if token.eq_ignore_ascii_case("l") {
            out.insert(DayOfMonth::FromEnd(1));
        } else if let Some(prefix) = token
            .strip_suffix('L')
            .or_else(|| token.strip_suffix('l'))
            .filter(|p| !p.ends_with('-'))
        {
            // kL: the k-th day from the end of the month
            let k: u32 = prefix
                .parse()
                .map_err(|_| invalid(FIELD, token, "expected a count before 'L'"))?;
            if !(1..=31).contains(&k) {
                return Err(invalid(FIELD, token, "count before 'L' must be 1..=31"));
            }
            out.insert(DayOfMonth::FromEnd(k));
        } else if let Some(start_str) = token
            .strip_suffix("-L")
            .or_else(|| token.strip_suffix("-l"))
        {
            // N-L: day N through the last day of the month
            let start = resolve_value(FIELD, start_str, 1, 31, &[])?;
            for day in start..=31 {
                out.insert(DayOfMonth::Day(day));
            }
        } else {
            let mut plain = BTreeSet::new();
            expand_token(FIELD, token, 1, 31, &[], &mut plain)?;
            out.extend(plain.into_iter().map(DayOfMonth::Day));
        }
    }

    if out.is_empty() {
        return Err(invalid(FIELD, text, "no values"));
    }

    Ok((out, false))
}

/// Validate a literal day-of-month array in the compact integer encoding.
pub(crate) fn validate_days_of_month(values: &[i32]) -> Result<(BTreeSet<DayOfMonth>, bool)> {
    let mut out = BTreeSet::new();
    for &value in values {
        out.insert(DayOfMonth::from_encoded(value)?);
    }
    if out.is_empty() {
        return Err(invalid("day-of-month", "[]", "no values"));
    }
    Ok((out, false))
}

/// Parse the day-of-week field. Returns the constraint set and whether the
/// field was an unrestricted wildcard ("don't care").
pub(crate) fn parse_days_of_week(text: &str) -> Result<(BTreeSet<DayOfWeek>, bool)> {
    const FIELD: &str = "day-of-week";

    if text == "*" || text == "?" {
        let all = (1..=7).map(DayOfWeek::Plain).collect();
        return Ok((all, true));
    }

    let mut out = BTreeSet::new();
    for token in text.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(invalid(FIELD, text, "empty token"));
        }

        if let Some((day_str, ordinal_str)) = token.split_once('#') {
            let weekday = normalize_sunday(resolve_value(
                FIELD,
                day_str,
                0,
                7,
                &WEEKDAY_NAMES,
            )?);
            if ordinal_str.eq_ignore_ascii_case("l") {
                out.insert(DayOfWeek::Last(weekday));
            } else {
                let k: u32 = ordinal_str
                    .parse()
                    .map_err(|_| invalid(FIELD, token, "expected 1-5 or 'L' after '#'"))?;
                if !(1..=5).contains(&k) {
                    return Err(invalid(FIELD, token, "occurrence must be 1..=5"));
                }
                out.insert(DayOfWeek::Nth(weekday, k));
            }
        } else {
            let mut plain = BTreeSet::new();
            expand_token(FIELD, token, 0, 7, &WEEKDAY_NAMES, &mut plain)?;
            out.extend(plain.into_iter().map(|d| DayOfWeek::Plain(normalize_sunday(d))));
        }
    }

    if out.is_empty() {
        return Err(invalid(FIELD, text, "no values"));
    }

    Ok((out, false))
}

/// Validate a literal day-of-week array in the extended integer encoding.
pub(crate) fn validate_days_of_week(values: &[u32]) -> Result<(BTreeSet<DayOfWeek>, bool)> {
    let mut out = BTreeSet::new();
    for &value in values {
        out.insert(DayOfWeek::from_encoded(value)?);
    }
    if out.is_empty() {
        return Err(invalid("day-of-week", "[]", "no values"));
    }
    Ok((out, false))
}

/// `0` is accepted as an alias for Sunday while parsing.
fn normalize_sunday(weekday: u32) -> u32 {
    if weekday == 0 {
        7
    } else {
        weekday
    }
}

pub(crate) fn month_names() -> &'static [(&'static str, u32)] {
    &MONTH_NAMES
}
