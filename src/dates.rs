//! Date parsing and display for content records.
//!
//! Data files store dates as `YYYY-MM-DD`, `YYYY-MM` or a bare `YYYY`. Display
//! helpers never fail: anything unparsable renders as an empty string and sorts
//! after every real date.
//!
//! - `"2024-01-15"` → short `"Jan 2024"`, long `"January 2024"`
//! - `"2024-03"` → short `"Mar 2024"`
//! - `"soon"` → `""`

use chrono::{Datelike, Local, NaiveDate};
use std::cmp::Ordering;

/// Parse a content date. Partial dates resolve to the first day of the period.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01-01"), "%Y-%m-%d"))
        .ok()
}

fn format_with(raw: Option<&str>, pattern: &str) -> String {
    raw.and_then(parse_date)
        .map(|d| d.format(pattern).to_string())
        .unwrap_or_default()
}

/// `"Jan 2024"`.
pub fn format_short(raw: Option<&str>) -> String {
    format_with(raw, "%b %Y")
}

/// `"January 2024"`.
pub fn format_long(raw: Option<&str>) -> String {
    format_with(raw, "%B %Y")
}

/// `"January 2022 - Present"` for ongoing periods, otherwise both ends.
/// Empty when the start date is missing or unparsable.
pub fn format_period(start: Option<&str>, end: Option<&str>, current: bool) -> String {
    let start = format_long(start);
    if start.is_empty() {
        return String::new();
    }
    let end = match end {
        Some(e) if !current => format_long(Some(e)),
        _ => String::new(),
    };
    let end = if end.is_empty() { "Present".to_string() } else { end };
    format!("{start} - {end}")
}

/// Local calendar date, the end point for ongoing [`duration`]s.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Elapsed time label: `"< 1 month"`, `"7 months"`, `"2 years"`, `"1 yr 3 mo"`.
///
/// Ongoing periods (or ones without an end) run until `today`. Empty when the
/// start date is missing or unparsable.
pub fn duration(start: Option<&str>, end: Option<&str>, current: bool, today: NaiveDate) -> String {
    let Some(start) = start.and_then(parse_date) else {
        return String::new();
    };
    let end = match end.and_then(parse_date) {
        Some(end) if !current => end,
        _ => today,
    };
    let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;

    if months < 1 {
        return "< 1 month".to_string();
    }
    if months < 12 {
        return format!("{months} month{}", if months > 1 { "s" } else { "" });
    }
    let years = months / 12;
    let rest = months % 12;
    let plural = if years > 1 { "s" } else { "" };
    if rest == 0 {
        format!("{years} year{plural}")
    } else {
        format!("{years} yr{plural} {rest} mo")
    }
}

/// Newest-first ordering; unparsable or missing dates go last.
pub fn newest_first(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a.and_then(parse_date), b.and_then(parse_date)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
