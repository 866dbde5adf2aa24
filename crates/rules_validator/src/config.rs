//! Validator configuration.

use crate::ErrorRenderer;
use indexmap::IndexMap;
use rules_core::{HandlerDefinition, Params};
use serde_json::Value;
use std::sync::Arc;

/// Options recognised when constructing a [`crate::Validator`].
///
/// # Example
///
/// ```rust
/// use rules_core::HandlerDefinition;
/// use rules_validator::ValidatorOptions;
/// use serde_json::json;
///
/// let options = ValidatorOptions::new()
///     .with_handler("sku", HandlerDefinition::pattern("^[A-Z]{3}-[0-9]{4}$").unwrap())
///     .with_meta(json!({"locale": "en"}))
///     .with_error(|rule, _params, _meta| format!("failed {rule}"));
///
/// assert!(options.handlers.contains_key("sku"));
/// ```
#[derive(Clone, Default)]
pub struct ValidatorOptions {
    /// Instance-local handlers that shadow the provider's
    pub handlers: IndexMap<String, HandlerDefinition>,

    /// Replaces the default message rendering
    pub error: Option<ErrorRenderer>,

    /// Opaque metadata handed to the error renderer
    pub meta: Value,
}

impl ValidatorOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instance-local handler.
    pub fn with_handler(mut self, name: impl Into<String>, handler: HandlerDefinition) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Sets the error rendering function.
    pub fn with_error<F>(mut self, render: F) -> Self
    where
        F: Fn(&str, &Params, &Value) -> String + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(render));
        self
    }

    /// Sets the metadata passed to the error renderer.
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = meta;
        self
    }
}

impl std::fmt::Debug for ValidatorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorOptions")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("error", &self.error.is_some())
            .field("meta", &self.meta)
            .finish()
    }
}
