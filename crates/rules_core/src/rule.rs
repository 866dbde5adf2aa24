//! Rule records and their options.
//!
//! Raw declarations arrive in several shapes (a bare name, a name → message
//! map, a name → options map, or a list of any of these). [`RuleDeclaration`]
//! accepts all of them from any serde format; [`crate::RuleSet`] turns them
//! into canonical [`RuleRecord`]s.

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix that inverts a handler's result.
pub const NOT_PREFIX: &str = "not:";

/// Which members of a format set a rule evaluates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckSelection {
    /// Pass when any member passes
    #[default]
    Any,
    /// Pass only when every member passes
    All,
    /// Consider only the named members; pass when any of them passes
    Named(Vec<String>),
}

impl CheckSelection {
    /// Returns true if the member takes part in the check.
    pub fn includes(&self, member: &str) -> bool {
        match self {
            Self::Any | Self::All => true,
            Self::Named(names) => names.iter().any(|n| n == member),
        }
    }

    fn from_names(names: Vec<String>) -> Self {
        match names.as_slice() {
            [single] if single == "any" => Self::Any,
            [single] if single == "all" => Self::All,
            _ => Self::Named(names),
        }
    }
}

impl From<&str> for CheckSelection {
    fn from(name: &str) -> Self {
        Self::from_names(vec![name.to_string()])
    }
}

impl<S: Into<String>> From<Vec<S>> for CheckSelection {
    fn from(names: Vec<S>) -> Self {
        Self::from_names(names.into_iter().map(Into::into).collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

impl<'de> Deserialize<'de> for CheckSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        OneOrMany::deserialize(deserializer).map(|names| Self::from_names(names.into_vec()))
    }
}

impl Serialize for CheckSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_str("any"),
            Self::All => serializer.serialize_str("all"),
            Self::Named(names) => names.serialize(serializer),
        }
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    OneOrMany::deserialize(deserializer).map(OneOrMany::into_vec)
}

fn default_true() -> bool {
    true
}

/// Options attached to a single rule.
///
/// Recognised keys are typed; every other key (`min`, `max`, `date`, ...) is
/// kept in `extra` for the handler and the message template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOptions {
    /// Custom message template for this rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Whether a missing field is an error
    #[serde(default = "default_true")]
    pub required: bool,

    /// Skip values that are `null`
    #[serde(default)]
    pub skip_null: bool,

    /// Skip values that are falsy or empty
    #[serde(default)]
    pub skip_empty: bool,

    /// Format-set member selection (`format` is accepted as an alias)
    #[serde(default)]
    pub check: CheckSelection,

    /// Event tags this rule is restricted to
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub on: Vec<String>,

    /// Handler-specific options
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            message: None,
            required: true,
            skip_null: false,
            skip_empty: false,
            check: CheckSelection::Any,
            on: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl RuleOptions {
    /// Creates options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying only a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Sets whether the field is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets null skipping.
    pub fn skip_null(mut self, skip: bool) -> Self {
        self.skip_null = skip;
        self
    }

    /// Sets empty-value skipping.
    pub fn skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    /// Sets the format-set selection.
    pub fn check(mut self, check: impl Into<CheckSelection>) -> Self {
        self.check = check.into();
        self
    }

    /// Restricts the rule to the given event tags.
    pub fn on<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.on = events.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a handler-specific option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Looks up a handler-specific option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Copy of these options with a different selection.
    pub fn with_check(&self, check: CheckSelection) -> Self {
        Self {
            check,
            ..self.clone()
        }
    }

    /// Moves a `format` entry left in `extra` into `check`.
    ///
    /// Both spellings are accepted in declarations; an explicit `check` wins.
    pub(crate) fn absorb_format_alias(&mut self) {
        let Some(format) = self.extra.shift_remove("format") else {
            return;
        };
        if self.check != CheckSelection::Any {
            return;
        }
        if let Ok(selection) = serde_json::from_value::<CheckSelection>(format) {
            self.check = selection;
        }
    }

    /// Parameters available to message templates.
    pub fn params(&self) -> Map<String, Value> {
        let mut params = self.extra.clone();
        if self.check != CheckSelection::Any {
            params.insert(
                "check".to_string(),
                serde_json::to_value(&self.check).unwrap_or(Value::Null),
            );
        }
        params
    }

    /// Returns true if the rule should run for the active events.
    ///
    /// A rule without `on`, or a run without active events, always applies.
    pub fn applies_to(&self, events: &[String]) -> bool {
        if events.is_empty() || self.on.is_empty() {
            return true;
        }
        self.on.iter().any(|tag| events.contains(tag))
    }
}

/// A canonical rule: one handler applied to one field path.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRecord {
    /// Dotted field path, possibly with `*` segments
    pub field: String,
    /// Handler name with any `not:` prefix removed
    pub handler: String,
    /// Whether the handler result is inverted
    pub negated: bool,
    /// Rule options with defaults filled in
    pub options: RuleOptions,
}

impl RuleRecord {
    /// Builds a record from a possibly `not:`-prefixed name.
    pub fn new(field: impl Into<String>, name: &str, mut options: RuleOptions) -> Self {
        options.absorb_format_alias();
        let (negated, handler) = match name.strip_prefix(NOT_PREFIX) {
            Some(stripped) => (true, stripped),
            None => (false, name),
        };

        Self {
            field: field.into(),
            handler: handler.to_string(),
            negated,
            options,
        }
    }

    /// The name as it was declared, prefix included.
    pub fn declared_name(&self) -> String {
        if self.negated {
            format!("{NOT_PREFIX}{}", self.handler)
        } else {
            self.handler.clone()
        }
    }
}

/// What a handler name maps to in a declaration map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// Custom message, all other options default
    Message(String),
    /// Full options object
    Options(RuleOptions),
    /// `null` / `~`: all defaults
    Defaults,
}

impl RuleSpec {
    /// Converts to options, filling defaults.
    pub fn into_options(self) -> RuleOptions {
        match self {
            Self::Message(message) => RuleOptions::with_message(message),
            Self::Options(options) => options,
            Self::Defaults => RuleOptions::default(),
        }
    }
}

/// A raw rule declaration for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleDeclaration {
    /// `"email"` or `"not:empty"`
    Name(String),
    /// Several declarations applied in order
    List(Vec<RuleDeclaration>),
    /// `{ "length": { "min": 1 }, "email": "bad address" }`
    Map(IndexMap<String, RuleSpec>),
}

impl RuleDeclaration {
    /// Parses a declaration from a JSON value.
    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Single handler with explicit options.
    pub fn with_options(name: impl Into<String>, options: RuleOptions) -> Self {
        let mut map = IndexMap::new();
        map.insert(name.into(), RuleSpec::Options(options));
        Self::Map(map)
    }
}

impl From<&str> for RuleDeclaration {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for RuleDeclaration {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl<T: Into<RuleDeclaration>> From<Vec<T>> for RuleDeclaration {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}
