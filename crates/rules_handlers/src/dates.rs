//! Date handlers.
//!
//! Accepted inputs:
//! - RFC 3339 (e.g., "2024-01-15T10:30:00Z", "2024-01-15T10:30:00+02:00")
//! - Date only (e.g., "2024-01-15"), taken as start of day UTC
//! - Date and time without zone (e.g., "2024-01-15 10:30:00"), taken as UTC
//! - Unix epoch seconds or milliseconds, as numbers or numeric strings

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rules_core::{HandlerDefinition, HandlerTable, OutParams, Result, RuleError, RuleOptions};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::debug;

/// Epoch values above this are read as milliseconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

pub(crate) fn install(table: &mut HandlerTable) {
    table
        .define(
            "date",
            HandlerDefinition::format_set([
                (
                    "iso",
                    HandlerDefinition::predicate(|v, _, _| {
                        Ok(v.as_str().is_some_and(|s| parse_rfc3339(s).is_some()))
                    }),
                ),
                (
                    "date",
                    HandlerDefinition::predicate(|v, _, _| {
                        Ok(v.as_str().is_some_and(|s| parse_day(s).is_some()))
                    }),
                ),
                (
                    "datetime",
                    HandlerDefinition::predicate(|v, _, _| {
                        Ok(v.as_str().is_some_and(|s| parse_naive(s).is_some()))
                    }),
                ),
                (
                    "timestamp",
                    HandlerDefinition::predicate(|v, _, _| Ok(parse_epoch(v).is_some())),
                ),
            ]),
            "must be a valid date",
        )
        .define(
            "dateAfter",
            HandlerDefinition::predicate(|v, options, out| {
                compare("dateAfter", v, options, out, Ordering::Greater)
            }),
            "must be after ${date}",
        )
        .define(
            "dateBefore",
            HandlerDefinition::predicate(|v, options, out| {
                compare("dateBefore", v, options, out, Ordering::Less)
            }),
            "must be before ${date}",
        );
}

/// Compares the value with the mandatory `date` option.
///
/// The normalized comparison date is written to `out` as `date`.
fn compare(
    rule: &str,
    value: &Value,
    options: &RuleOptions,
    out: &mut OutParams,
    expected: Ordering,
) -> Result<bool> {
    let raw = options
        .get("date")
        .ok_or_else(|| RuleError::missing_option(rule, "date"))?;
    let limit = parse_date(raw)
        .ok_or_else(|| RuleError::invalid_option(rule, "date", format!("unparseable date {raw}")))?;

    out.insert("date".to_string(), Value::String(limit.to_rfc3339()));

    match parse_date(value) {
        Some(date) => Ok(date.cmp(&limit) == expected),
        None => {
            debug!("{}: value {} is not a date", rule, value);
            Ok(false)
        }
    }
}

/// Parses a date-like JSON value in any of the accepted formats.
///
/// # Example
///
/// ```rust
/// use rules_handlers::parse_date;
/// use serde_json::json;
///
/// let a = parse_date(&json!("2024-01-15")).unwrap();
/// let b = parse_date(&json!(1705276800)).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(_) => parse_epoch(value),
        Value::String(s) => {
            let s = s.trim();
            parse_rfc3339(s)
                .or_else(|| parse_epoch(value))
                .or_else(|| parse_naive(s))
                .or_else(|| parse_day(s))
        }
        _ => None,
    }
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn parse_day(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn parse_epoch(value: &Value) -> Option<DateTime<Utc>> {
    let epoch = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    if epoch > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    }
}
