//! Comparison handlers: membership, equality and caller-supplied patterns.

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use regex::Regex;
use rules_core::{
    HandlerDefinition, HandlerTable, OutParams, Predicate, Result, RuleError, RuleOptions,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub(crate) fn install(table: &mut HandlerTable) {
    table
        .define(
            "in",
            HandlerDefinition::predicate(|v, options, _| {
                let values = options
                    .get("values")
                    .ok_or_else(|| RuleError::missing_option("in", "values"))?;
                match values {
                    Value::Array(allowed) => Ok(allowed.contains(v)),
                    _ => Err(RuleError::invalid_option("in", "values", "expected a list")),
                }
            }),
            "must be one of ${values}",
        )
        .define(
            "equals",
            HandlerDefinition::predicate(|v, options, _| {
                let expected = options
                    .get("value")
                    .ok_or_else(|| RuleError::missing_option("equals", "value"))?;
                Ok(v == expected)
            }),
            "must be equal to ${value}",
        )
        .define(
            "matches",
            HandlerDefinition::from_predicate(MatchesPredicate::default()),
            "must match ${pattern}",
        );
}

/// Most distinct patterns kept compiled at once.
const REGEX_CACHE_LIMIT: usize = 256;

/// Matches the value against the rule's `pattern` option.
///
/// Compiled expressions are cached per pattern string; the cache is emptied
/// once it holds [`REGEX_CACHE_LIMIT`] entries.
#[derive(Default)]
struct MatchesPredicate {
    regex_cache: Mutex<HashMap<String, Regex>>,
}

impl MatchesPredicate {
    fn is_match(&self, value: &Value, options: &RuleOptions) -> Result<bool> {
        let pattern = match options.get("pattern") {
            Some(Value::String(p)) => p,
            Some(_) => {
                return Err(RuleError::invalid_option(
                    "matches",
                    "pattern",
                    "expected a string",
                ));
            }
            None => return Err(RuleError::missing_option("matches", "pattern")),
        };

        let mut cache = self.regex_cache.lock();
        let re = match cache.get(pattern) {
            Some(re) => re.clone(),
            None => {
                let re =
                    Regex::new(pattern).map_err(|e| RuleError::invalid_pattern(pattern, e))?;
                if cache.len() >= REGEX_CACHE_LIMIT {
                    debug!("Regex cache full, evicting {} pattern(s)", cache.len());
                    cache.clear();
                }
                cache.insert(pattern.clone(), re.clone());
                re
            }
        };

        Ok(value.as_str().is_some_and(|s| re.is_match(s)))
    }
}

impl Predicate for MatchesPredicate {
    fn call<'a>(
        &'a self,
        value: &'a Value,
        options: &'a RuleOptions,
        _out: &'a mut OutParams,
    ) -> BoxFuture<'a, Result<bool>> {
        future::ready(self.is_match(value, options)).boxed()
    }
}
