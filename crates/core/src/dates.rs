//! Date normalization for display strings.
//!
//! Stored dates arrive in many shapes: spreadsheet serial numbers, ISO
//! dates, `DD/MM/YYYY` strings, or partial day / day-month forms typed into
//! the expense tables. Everything is normalized to one display string per
//! mode. Normalization is total: it never fails, and normalizing an already
//! normalized value returns it unchanged.

use chrono::{Days, NaiveDate};

/// Which display shape a date field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateMode {
    /// `DD/MM/YYYY`
    Full,
    /// `DD`, day of month only (monthly expenses)
    Day,
    /// `DD/MM` (yearly expenses)
    DayMonth,
}

/// Spreadsheet serial dates count days from this epoch.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Normalize `raw` for the given mode.
///
/// - `Full`: `DD/MM/YYYY` passes through, positive integers are serial dates,
///   `YYYY-MM-DD` (optionally with a `T...` time part) is reformatted, and
///   anything else comes back trimmed.
/// - `Day`: zero-padded day of month, or `""` when no valid day is found.
/// - `DayMonth`: `DD/MM`, or `""` when no valid day and month are found.
pub fn normalize_date(raw: &str, mode: DateMode) -> String {
    let trimmed = raw.trim();
    match mode {
        DateMode::Full => normalize_full(trimmed),
        DateMode::Day => extract_day(trimmed)
            .map(|day| format!("{day:02}"))
            .unwrap_or_default(),
        DateMode::DayMonth => extract_day_month(trimmed)
            .map(|(day, month)| format!("{day:02}/{month:02}"))
            .unwrap_or_default(),
    }
}

/// Convert a spreadsheet serial day count into a calendar date.
/// Returns `None` for zero or for counts past chrono's date range.
pub fn serial_to_date(serial: u64) -> Option<NaiveDate> {
    if serial == 0 {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(serial))
}

fn normalize_full(value: &str) -> String {
    if is_display_date(value) {
        return value.to_string();
    }

    if is_digits(value) {
        return value
            .parse::<u64>()
            .ok()
            .and_then(serial_to_date)
            .map(|date| date.format(DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| value.to_string());
    }

    match iso_parts(value).and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)) {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => value.to_string(),
    }
}

fn extract_day(value: &str) -> Option<u32> {
    if value.is_empty() {
        return None;
    }
    let day = if let Some((_, _, d)) = iso_parts(value) {
        d
    } else if value.contains(['/', '-']) {
        let parts: Vec<&str> = value.split(['/', '-']).map(str::trim).collect();
        if parts[0].len() == 4 {
            parse_small(parts.get(2)?)?
        } else {
            parse_small(parts[0])?
        }
    } else {
        parse_small(value)?
    };
    valid_day(day)
}

fn extract_day_month(value: &str) -> Option<(u32, u32)> {
    let (day, month) = if let Some((_, m, d)) = iso_parts(value) {
        (d, m)
    } else if value.contains(['/', '-']) {
        let parts: Vec<&str> = value.split(['/', '-']).map(str::trim).collect();
        if parts[0].len() == 4 {
            (parse_small(parts.get(2)?)?, parse_small(parts.get(1)?)?)
        } else {
            (parse_small(parts[0])?, parse_small(parts.get(1)?)?)
        }
    } else {
        return None;
    };
    Some((valid_day(day)?, valid_month(month)?))
}

/// Split `YYYY-MM-DD` (with an optional `T...` suffix) into its numbers.
/// Does not check that the date exists.
fn iso_parts(value: &str) -> Option<(i32, u32, u32)> {
    let date_part = match value.split_once('T') {
        Some((date, _time)) => date,
        None => value,
    };
    let mut parts = date_part.split('-');
    let (y, m, d) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || y.len() != 4 || m.len() != 2 || d.len() != 2 {
        return None;
    }
    if !is_digits(y) || !is_digits(m) || !is_digits(d) {
        return None;
    }
    Some((y.parse().ok()?, m.parse().ok()?, d.parse().ok()?))
}

fn is_display_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('/').collect();
    matches!(parts.as_slice(), [d, m, y]
        if d.len() == 2 && m.len() == 2 && y.len() == 4
            && is_digits(d) && is_digits(m) && is_digits(y))
}

/// One- or two-digit number.
fn parse_small(value: &str) -> Option<u32> {
    if value.is_empty() || value.len() > 2 || !is_digits(value) {
        return None;
    }
    value.parse().ok()
}

fn valid_day(day: u32) -> Option<u32> {
    (1..=31).contains(&day).then_some(day)
}

fn valid_month(month: u32) -> Option<u32> {
    (1..=12).contains(&month).then_some(month)
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
