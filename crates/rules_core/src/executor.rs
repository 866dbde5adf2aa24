//! Check execution.
//!
//! Evaluates one handler definition against one value. Format sets recurse
//! through this same entry point; each member is awaited before the next one
//! starts, so evaluation order is always member order.

use crate::{CheckSelection, HandlerDefinition, OutParams, Result, RuleOptions};
use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use serde_json::Value;
use tracing::trace;

/// Runs `handler` against `value`.
///
/// # Example
///
/// ```rust
/// use rules_core::{check, HandlerDefinition, OutParams, RuleOptions};
/// use serde_json::json;
///
/// # futures::executor::block_on(async {
/// let handler = HandlerDefinition::pattern("^[a-z]+$").unwrap();
/// let mut out = OutParams::new();
///
/// let passed = check(&json!("abc"), &handler, &RuleOptions::default(), &mut out)
///     .await
///     .unwrap();
/// assert!(passed);
/// # });
/// ```
pub fn check<'a>(
    value: &'a Value,
    handler: &'a HandlerDefinition,
    options: &'a RuleOptions,
    out: &'a mut OutParams,
) -> BoxFuture<'a, Result<bool>> {
    async move {
        match handler {
            HandlerDefinition::Predicate(predicate) => predicate.call(value, options, out).await,
            HandlerDefinition::Pattern(re) => Ok(matches_pattern(re, value)),
            HandlerDefinition::FormatSet(members) => {
                // Selection applies to this level only; nested sets run in "any" mode.
                let nested = options.with_check(CheckSelection::Any);
                let mut considered = 0usize;

                for (name, member) in members {
                    if !options.check.includes(name) {
                        continue;
                    }
                    considered += 1;

                    let passed = check(value, member, &nested, &mut *out).await?;
                    trace!("Format member '{}' -> {}", name, passed);

                    match (&options.check, passed) {
                        (CheckSelection::All, false) => return Ok(false),
                        (CheckSelection::All, true) => {}
                        (_, true) => return Ok(true),
                        (_, false) => {}
                    }
                }

                Ok(matches!(options.check, CheckSelection::All) && considered > 0)
            }
        }
    }
    .boxed()
}

/// Matches strings, numbers and booleans by their text; other values fail.
fn matches_pattern(re: &Regex, value: &Value) -> bool {
    match value {
        Value::String(s) => re.is_match(s),
        Value::Number(n) => re.is_match(&n.to_string()),
        Value::Bool(b) => re.is_match(if *b { "true" } else { "false" }),
        _ => false,
    }
}
