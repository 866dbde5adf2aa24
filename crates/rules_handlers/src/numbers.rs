//! Numeric handlers: ranges, lengths and checksums.
//!
//! Range bounds are inclusive. A bound that is not supplied accepts every
//! value except the matching infinity, so `between` with only `min` still
//! rejects `+inf`.

use rules_core::{HandlerDefinition, HandlerTable, Result, RuleError, RuleOptions};
use serde_json::Value;

pub(crate) fn install(table: &mut HandlerTable) {
    table
        .define(
            "between",
            HandlerDefinition::predicate(|v, options, _| {
                let (min, max) = bounds("between", options)?;
                Ok(number(v).is_some_and(|n| in_range(n, min, max)))
            }),
            "must be between ${min} and ${max}",
        )
        .define(
            "length",
            HandlerDefinition::predicate(|v, options, _| {
                let (min, max) = bounds("length", options)?;
                let len = match v {
                    Value::String(s) => s.chars().count(),
                    Value::Array(items) => items.len(),
                    _ => return Ok(false),
                };
                Ok(in_range(len as f64, min, max))
            }),
            "must be between ${min} and ${max} character long",
        )
        .define(
            "luhn",
            HandlerDefinition::predicate(|v, _, _| {
                Ok(digits(v).is_some_and(|d| d.len() >= 2 && luhn(&d)))
            }),
            "must pass the luhn checksum",
        )
        .define(
            "creditCard",
            HandlerDefinition::predicate(|v, _, _| {
                Ok(digits(v).is_some_and(|d| (12..=19).contains(&d.len()) && luhn(&d)))
            }),
            "must be a valid credit card number",
        );
}

/// Reads the optional `min` / `max` options.
fn bounds(rule: &str, options: &RuleOptions) -> Result<(Option<f64>, Option<f64>)> {
    let read = |key: &str| -> Result<Option<f64>> {
        match options.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => number(value)
                .map(Some)
                .ok_or_else(|| RuleError::invalid_option(rule, key, "expected a number")),
        }
    };
    Ok((read("min")?, read("max")?))
}

fn in_range(n: f64, min: Option<f64>, max: Option<f64>) -> bool {
    let above = match min {
        Some(min) => n >= min,
        None => n > f64::NEG_INFINITY,
    };
    let below = match max {
        Some(max) => n <= max,
        None => n < f64::INFINITY,
    };
    above && below
}

/// Numbers and numeric strings; `"inf"`/`"-infinity"` parse to infinities.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
        _ => None,
    }
}

/// Digits of a card-like value, ignoring spaces and dashes.
fn digits(value: &Value) -> Option<Vec<u8>> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_u64() => n.to_string(),
        _ => return None,
    };

    text.chars()
        .filter(|c| *c != ' ' && *c != '-')
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect()
}

/// Luhn checksum over a digit sequence.
///
/// # Example
///
/// ```rust
/// use rules_handlers::luhn;
///
/// assert!(luhn(&[7, 9, 9, 2, 7, 3, 9, 8, 7, 1, 3]));
/// assert!(!luhn(&[7, 9, 9, 2, 7, 3, 9, 8, 7, 1, 4]));
/// ```
pub fn luhn(digits: &[u8]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = u32::from(d);
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}
