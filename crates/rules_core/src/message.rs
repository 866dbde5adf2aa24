//! Message templating.
//!
//! Templates use `${name}` placeholders. Placeholders without a matching
//! parameter are left as written.

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)\}").expect("placeholder pattern is valid"));

/// Parameters substituted into a message template.
pub type Params = Map<String, Value>;

/// Substitutes `${key}` placeholders from `params`.
///
/// # Example
///
/// ```rust
/// use rules_core::{render, Params};
/// use serde_json::json;
///
/// let mut params = Params::new();
/// params.insert("min".into(), json!(1));
/// params.insert("max".into(), json!(7));
///
/// assert_eq!(
///     render("must be between ${min} and ${max} character long", &params),
///     "must be between 1 and 7 character long"
/// );
/// ```
pub fn render(template: &str, params: &Params) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(value) => display_value(value),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Text form of a value inside a message.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(|v| !v.is_array() && !v.is_object()) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
