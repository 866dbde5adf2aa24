//! Main validation engine.
//!
//! This module provides the [`Validator`] session that runs every declared
//! rule against a data tree and collects rendered failure messages.

use crate::{ErrorCollector, ValidatorOptions};
use indexmap::IndexMap;
use rules_core::{
    check, render, resolve, CapabilityProvider, HandlerDefinition, OutParams, Params, Result,
    RuleDeclaration, RuleError, RuleRecord, RuleSet, DEFAULT_MESSAGE_KEY, NOT_PREFIX,
    REQUIRED_MESSAGE_KEY,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Custom message rendering: `(rule name, parameters, session meta) -> message`.
pub type ErrorRenderer = Arc<dyn Fn(&str, &Params, &Value) -> String + Send + Sync>;

/// Lifecycle of the most recent validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    /// No run has completed yet, or the last one aborted with an error
    Idle,
    /// A run is in progress
    Running,
    /// The last run finished and `errors()` holds its results
    Complete,
}

/// Validates structured data against declared rules.
///
/// A validator owns its rules, its instance-local handler and message
/// overrides, its metadata and the errors of the last run. Lookups check the
/// instance first and fall back to the shared provider; nothing set on the
/// instance leaks into the provider.
///
/// Runs are not re-entrant: `validate` takes `&mut self`, so concurrent calls
/// on one instance must be serialized by the caller.
///
/// # Example
///
/// ```rust
/// use rules_core::{HandlerDefinition, Registry};
/// use rules_validator::Validator;
/// use serde_json::json;
///
/// # futures::executor::block_on(async {
/// let registry = Registry::with_seed(|table| {
///     table.set_message("required", "is required");
///     table.define(
///         "digits",
///         HandlerDefinition::pattern("^[0-9]+$").unwrap(),
///         "must contain only digits",
///     );
/// });
///
/// let mut validator = Validator::new(registry);
/// validator.rule("zip", "digits");
///
/// let passed = validator.validate(&json!({"zip": "12a45"})).await.unwrap();
/// assert!(!passed);
/// assert_eq!(validator.first_error("zip"), Some("must contain only digits"));
/// # });
/// ```
pub struct Validator {
    provider: Arc<dyn CapabilityProvider>,
    rules: RuleSet,
    handlers: IndexMap<String, HandlerDefinition>,
    messages: IndexMap<String, String>,
    meta: Value,
    error: Option<ErrorRenderer>,
    errors: ErrorCollector,
    state: ValidationState,
}

impl Validator {
    /// Creates a validator backed by `provider`.
    pub fn new<P: CapabilityProvider + 'static>(provider: P) -> Self {
        Self::with_options(provider, ValidatorOptions::default())
    }

    /// Creates a validator with construction options.
    pub fn with_options<P: CapabilityProvider + 'static>(
        provider: P,
        options: ValidatorOptions,
    ) -> Self {
        Self::from_shared(Arc::new(provider), options)
    }

    /// Creates a validator from an already shared provider.
    pub fn from_shared(provider: Arc<dyn CapabilityProvider>, options: ValidatorOptions) -> Self {
        Self {
            provider,
            rules: RuleSet::new(),
            handlers: options.handlers,
            messages: IndexMap::new(),
            meta: options.meta,
            error: options.error,
            errors: ErrorCollector::new(),
            state: ValidationState::Idle,
        }
    }

    // ------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------

    /// Declares one or more rules for `field`, appending to existing ones.
    pub fn rule(&mut self, field: &str, declaration: impl Into<RuleDeclaration>) -> &mut Self {
        self.rules.add(field, declaration);
        self
    }

    /// Declares rules for several fields in order.
    pub fn rules(&mut self, declarations: IndexMap<String, RuleDeclaration>) -> &mut Self {
        self.rules.extend(declarations);
        self
    }

    /// Normalized records for `field`.
    pub fn rules_for(&self, field: &str) -> Option<&[RuleRecord]> {
        self.rules.get(field)
    }

    /// Every declared rule.
    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    /// Returns true if the handler exists locally or in the provider.
    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name) || self.provider.has(name)
    }

    /// Resolves a handler, local definitions first.
    pub fn handler(&self, name: &str) -> Result<HandlerDefinition> {
        if let Some(handler) = self.handlers.get(name) {
            debug!("Handler '{}' resolved locally", name);
            return Ok(handler.clone());
        }
        self.provider
            .handler(name)
            .ok_or_else(|| RuleError::unknown_handler(name))
    }

    /// Defines an instance-local handler. Last write wins.
    pub fn set(&mut self, name: impl Into<String>, handler: HandlerDefinition) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Bulk local handler update: merges when `append`, replaces otherwise.
    pub fn handlers(
        &mut self,
        handlers: IndexMap<String, HandlerDefinition>,
        append: bool,
    ) -> &IndexMap<String, HandlerDefinition> {
        if append {
            self.handlers.extend(handlers);
        } else {
            self.handlers = handlers;
        }
        &self.handlers
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Message template that applies to `name`, local override first.
    pub fn message(&self, name: &str) -> Option<String> {
        self.messages
            .get(name)
            .cloned()
            .or_else(|| self.provider.message(name))
    }

    /// Overrides the message template for `name` on this instance.
    pub fn set_message(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.messages.insert(name.into(), text.into());
        self
    }

    /// Bulk local message update; returns the local message table.
    pub fn messages(
        &mut self,
        messages: IndexMap<String, String>,
        append: bool,
    ) -> &IndexMap<String, String> {
        if append {
            self.messages.extend(messages);
        } else {
            self.messages = messages;
        }
        &self.messages
    }

    // ------------------------------------------------------------------
    // Meta and rendering
    // ------------------------------------------------------------------

    /// Metadata passed to the error renderer.
    pub fn meta(&self) -> &Value {
        &self.meta
    }

    /// Replaces the metadata.
    pub fn set_meta(&mut self, meta: Value) -> &mut Self {
        self.meta = meta;
        self
    }

    /// Replaces the message rendering function.
    pub fn set_error<F>(&mut self, render: F) -> &mut Self
    where
        F: Fn(&str, &Params, &Value) -> String + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(render));
        self
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Validates `data` against every rule.
    ///
    /// Returns `Ok(false)` when any check failed; the messages are then in
    /// [`Validator::errors`]. Only configuration problems (an unknown handler,
    /// a rule missing a mandatory option) are returned as `Err`.
    pub async fn validate(&mut self, data: &Value) -> Result<bool> {
        self.validate_on::<&str>(data, &[]).await
    }

    /// Validates `data`, running only rules that apply to the active events.
    pub async fn validate_on<S: AsRef<str>>(&mut self, data: &Value, events: &[S]) -> Result<bool> {
        let events: Vec<String> = events.iter().map(|e| e.as_ref().to_string()).collect();
        self.state = ValidationState::Running;

        let mut errors = ErrorCollector::new();
        let result = self.run(data, &events, &mut errors).await;

        self.errors = errors;
        self.state = match result {
            Ok(_) => ValidationState::Complete,
            Err(_) => ValidationState::Idle,
        };

        if let Ok(passed) = result {
            debug!(
                "Validation finished: passed={}, {} field(s) with errors",
                passed,
                self.errors.len()
            );
        }
        result
    }

    async fn run(
        &self,
        data: &Value,
        events: &[String],
        errors: &mut ErrorCollector,
    ) -> Result<bool> {
        let mut passed = true;

        for (field, records) in self.rules.iter() {
            for record in records {
                if !record.options.applies_to(events) {
                    debug!(
                        "Skipping '{}' on '{}': no matching event",
                        record.declared_name(),
                        field
                    );
                    continue;
                }

                let resolved = resolve(data, field);
                if resolved.is_empty() {
                    if record.options.required {
                        debug!("Required field '{}' is missing", field);
                        errors.add(field, self.render_required(record));
                        passed = false;
                    }
                    continue;
                }

                debug!(
                    "Checking '{}' with '{}' ({} value(s))",
                    field,
                    record.declared_name(),
                    resolved.len()
                );

                // Looked up on the first value that is not skipped
                let mut handler: Option<HandlerDefinition> = None;

                for (key, value) in resolved {
                    if skipped(record, value) {
                        trace!("Skipping value at '{}'", key);
                        continue;
                    }

                    if handler.is_none() {
                        handler = Some(self.handler(&record.handler)?);
                    }
                    let Some(definition) = handler.as_ref() else {
                        continue;
                    };

                    let mut out = OutParams::new();
                    let result = check(value, definition, &record.options, &mut out).await?;
                    trace!("'{}' -> {}", key, result);

                    if result == record.negated {
                        let message = self.render_failure(record, &key, out);
                        errors.add(key, message);
                        passed = false;
                    }
                }
            }
        }

        Ok(passed)
    }

    /// Message for a missing required field; the rule's own message is ignored.
    fn render_required(&self, record: &RuleRecord) -> String {
        let template = self
            .message(REQUIRED_MESSAGE_KEY)
            .unwrap_or_else(|| self.default_template());
        let params = self.params(record, &record.field, OutParams::new());
        self.render_with(REQUIRED_MESSAGE_KEY, &template, &params)
    }

    fn render_failure(&self, record: &RuleRecord, key: &str, out: OutParams) -> String {
        let template = record
            .options
            .message
            .clone()
            .or_else(|| {
                record
                    .negated
                    .then(|| self.message(&format!("{NOT_PREFIX}{}", record.handler)))
                    .flatten()
            })
            .or_else(|| self.message(&record.handler))
            .unwrap_or_else(|| self.default_template());
        let mut params = self.params(record, key, out);
        if let Some(message) = &record.options.message {
            params.insert("message".to_string(), Value::String(message.clone()));
        }
        self.render_with(&record.handler, &template, &params)
    }

    fn default_template(&self) -> String {
        self.messages
            .get(DEFAULT_MESSAGE_KEY)
            .cloned()
            .unwrap_or_else(|| self.provider.default_message())
    }

    fn params(&self, record: &RuleRecord, key: &str, out: OutParams) -> Params {
        let mut params = record.options.params();
        params.extend(out);
        params.insert("field".to_string(), Value::String(key.to_string()));
        params.insert("rule".to_string(), Value::String(record.handler.clone()));
        params.insert("negated".to_string(), Value::Bool(record.negated));
        params.insert(
            "not".to_string(),
            Value::String(if record.negated { "not " } else { "" }.to_string()),
        );
        params
    }

    fn render_with(&self, rule: &str, template: &str, params: &Params) -> String {
        match &self.error {
            Some(custom) => custom(rule, params, &self.meta),
            None => render(template, params),
        }
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    /// Errors of the last run.
    pub fn errors(&self) -> &ErrorCollector {
        &self.errors
    }

    /// Messages recorded for a resolved key in the last run.
    pub fn errors_for(&self, key: &str) -> Option<&[String]> {
        self.errors.get(key)
    }

    /// First message recorded for a resolved key in the last run.
    pub fn first_error(&self, key: &str) -> Option<&str> {
        self.errors.first(key)
    }

    /// Returns true if the last completed run recorded no errors.
    pub fn passed(&self) -> bool {
        self.state == ValidationState::Complete && self.errors.is_empty()
    }

    /// State of the most recent run.
    pub fn state(&self) -> ValidationState {
        self.state
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("messages", &self.messages)
            .field("meta", &self.meta)
            .field("state", &self.state)
            .finish()
    }
}

fn skipped(record: &RuleRecord, value: &Value) -> bool {
    (record.options.skip_null && value.is_null()) || (record.options.skip_empty && is_blank(value))
}

/// Falsy or empty: `null`, `false`, zero, `""`, `[]`, `{}`.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
