//! Handler definitions.
//!
//! A handler is the named check a rule points at. It is one of three shapes:
//! a predicate (sync or async), a compiled regular expression, or a format set
//! mapping member names to further handlers.

use crate::{RuleError, RuleOptions, Result};
use futures::future::{self, BoxFuture, FutureExt};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Values a handler wants echoed into the rendered message.
pub type OutParams = Map<String, Value>;

/// Ordered members of a format set.
pub type FormatSet = IndexMap<String, HandlerDefinition>;

/// A check that decides whether a value passes.
///
/// Implement this directly for stateful handlers, or use
/// [`HandlerDefinition::predicate`] / [`HandlerDefinition::async_predicate`]
/// to wrap a closure.
pub trait Predicate: Send + Sync {
    /// Evaluates the value with the rule's options.
    ///
    /// Anything written to `out` is merged into the message parameters when
    /// the check fails.
    fn call<'a>(
        &'a self,
        value: &'a Value,
        options: &'a RuleOptions,
        out: &'a mut OutParams,
    ) -> BoxFuture<'a, Result<bool>>;
}

struct SyncPredicate<F>(F);

impl<F> Predicate for SyncPredicate<F>
where
    F: Fn(&Value, &RuleOptions, &mut OutParams) -> Result<bool> + Send + Sync,
{
    fn call<'a>(
        &'a self,
        value: &'a Value,
        options: &'a RuleOptions,
        out: &'a mut OutParams,
    ) -> BoxFuture<'a, Result<bool>> {
        future::ready((self.0)(value, options, out)).boxed()
    }
}

struct AsyncPredicate<F>(F);

impl<F, Fut> Predicate for AsyncPredicate<F>
where
    F: Fn(Value, RuleOptions) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool>> + Send + 'static,
{
    fn call<'a>(
        &'a self,
        value: &'a Value,
        options: &'a RuleOptions,
        _out: &'a mut OutParams,
    ) -> BoxFuture<'a, Result<bool>> {
        (self.0)(value.clone(), options.clone()).boxed()
    }
}

struct AsyncOutPredicate<F>(F);

impl<F, Fut> Predicate for AsyncOutPredicate<F>
where
    F: Fn(Value, RuleOptions) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(bool, OutParams)>> + Send + 'static,
{
    fn call<'a>(
        &'a self,
        value: &'a Value,
        options: &'a RuleOptions,
        out: &'a mut OutParams,
    ) -> BoxFuture<'a, Result<bool>> {
        let fut = (self.0)(value.clone(), options.clone());
        async move {
            let (passed, params) = fut.await?;
            out.extend(params);
            Ok(passed)
        }
        .boxed()
    }
}

/// A named check definition usable by a rule.
#[derive(Clone)]
pub enum HandlerDefinition {
    /// Arbitrary check, possibly asynchronous
    Predicate(Arc<dyn Predicate>),
    /// Passes when the value's text matches the expression
    Pattern(Regex),
    /// Named alternatives selected by the rule's `check` option
    FormatSet(FormatSet),
}

impl HandlerDefinition {
    /// Wraps a synchronous closure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rules_core::HandlerDefinition;
    ///
    /// let even = HandlerDefinition::predicate(|value, _options, _out| {
    ///     Ok(value.as_i64().is_some_and(|n| n % 2 == 0))
    /// });
    /// assert_eq!(even.kind(), "predicate");
    /// ```
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value, &RuleOptions, &mut OutParams) -> Result<bool> + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(SyncPredicate(f)))
    }

    /// Wraps an asynchronous closure.
    ///
    /// The closure receives owned copies of the value and options so the
    /// returned future can outlive the validation borrow. Use
    /// [`HandlerDefinition::async_predicate_with_out`] to report message
    /// parameters.
    pub fn async_predicate<F, Fut>(f: F) -> Self
    where
        F: Fn(Value, RuleOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        Self::Predicate(Arc::new(AsyncPredicate(f)))
    }

    /// Wraps an asynchronous closure that also returns message parameters.
    ///
    /// The returned parameters are merged into the rule's out-params.
    pub fn async_predicate_with_out<F, Fut>(f: F) -> Self
    where
        F: Fn(Value, RuleOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(bool, OutParams)>> + Send + 'static,
    {
        Self::Predicate(Arc::new(AsyncOutPredicate(f)))
    }

    /// Wraps a custom [`Predicate`] implementation.
    pub fn from_predicate(predicate: impl Predicate + 'static) -> Self {
        Self::Predicate(Arc::new(predicate))
    }

    /// Compiles a regular expression handler.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| RuleError::invalid_pattern(pattern, e))
    }

    /// Builds a format set from `(name, handler)` pairs, keeping their order.
    pub fn format_set<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = (S, HandlerDefinition)>,
        S: Into<String>,
    {
        Self::FormatSet(
            members
                .into_iter()
                .map(|(name, handler)| (name.into(), handler))
                .collect(),
        )
    }

    /// Short name of the variant, for logs and listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Predicate(_) => "predicate",
            Self::Pattern(_) => "pattern",
            Self::FormatSet(_) => "format set",
        }
    }
}

impl fmt::Debug for HandlerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::FormatSet(set) => f
                .debug_tuple("FormatSet")
                .field(&set.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

impl From<Regex> for HandlerDefinition {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pattern_compiles() {
        let handler = HandlerDefinition::pattern("^[a-z]+$").unwrap();
        assert_eq!(handler.kind(), "pattern");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = HandlerDefinition::pattern("([a-z").unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
    }

    #[test]
    fn test_format_set_keeps_member_order() {
        let set = HandlerDefinition::format_set([
            ("zeta", HandlerDefinition::pattern("z").unwrap()),
            ("alpha", HandlerDefinition::pattern("a").unwrap()),
        ]);

        match set {
            HandlerDefinition::FormatSet(members) => {
                let names: Vec<_> = members.keys().map(String::as_str).collect();
                assert_eq!(names, vec!["zeta", "alpha"]);
            }
            other => panic!("expected format set, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sync_predicate_writes_out_params() {
        let handler = HandlerDefinition::predicate(|value, _, out| {
            out.insert("seen".to_string(), value.clone());
            Ok(true)
        });
        let HandlerDefinition::Predicate(predicate) = handler else {
            panic!("expected predicate");
        };

        let mut out = OutParams::new();
        let options = RuleOptions::default();
        let value = json!(3);
        assert!(predicate.call(&value, &options, &mut out).await.unwrap());
        assert_eq!(out.get("seen"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_async_predicate_returns_out_params() {
        let handler = HandlerDefinition::async_predicate_with_out(|value, _| async move {
            let mut params = OutParams::new();
            params.insert("limit".to_string(), json!(10));
            Ok((value.as_i64().is_some_and(|n| n <= 10), params))
        });
        let HandlerDefinition::Predicate(predicate) = handler else {
            panic!("expected predicate");
        };

        let mut out = OutParams::new();
        let options = RuleOptions::default();
        let value = json!(42);
        assert!(!predicate.call(&value, &options, &mut out).await.unwrap());
        assert_eq!(out.get("limit"), Some(&json!(10)));
    }
}
