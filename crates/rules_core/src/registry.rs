//! Handler registries.
//!
//! [`CapabilityProvider`] is the seam between the validation engine and
//! whatever supplies handler definitions and message templates. [`Registry`]
//! is the standard implementation: a shared, cheaply cloned handle that
//! validator instances hold explicitly instead of reaching for a global.

use crate::{HandlerDefinition, OutParams, Result, RuleError, RuleOptions};
use futures::future::BoxFuture;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Message key used when no handler-specific message exists.
pub const DEFAULT_MESSAGE_KEY: &str = "_default_";

/// Message key used when a required field is missing.
pub const REQUIRED_MESSAGE_KEY: &str = "required";

/// Last-resort message when no registry provides `_default_`.
pub const FALLBACK_MESSAGE: &str = "is invalid";

/// Source of handler definitions and message templates.
pub trait CapabilityProvider: Send + Sync {
    /// Returns true if a handler with this name exists.
    fn has(&self, name: &str) -> bool;

    /// Looks up a handler definition.
    fn handler(&self, name: &str) -> Option<HandlerDefinition>;

    /// Looks up the message template registered for a handler.
    fn message(&self, name: &str) -> Option<String>;

    /// Looks up a handler, failing with `UnknownHandler` if absent.
    fn get(&self, name: &str) -> Result<HandlerDefinition> {
        self.handler(name)
            .ok_or_else(|| RuleError::unknown_handler(name))
    }

    /// Template used when neither rule nor handler has a message.
    fn default_message(&self) -> String {
        self.message(DEFAULT_MESSAGE_KEY)
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
    }

    /// Names of every known handler, in registration order.
    fn names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Handlers and messages stored by a [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    handlers: IndexMap<String, HandlerDefinition>,
    messages: IndexMap<String, String>,
}

impl HandlerTable {
    /// Registers or replaces a handler.
    pub fn set(&mut self, name: impl Into<String>, handler: HandlerDefinition) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Registers or replaces a message template.
    pub fn set_message(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.messages.insert(name.into(), text.into());
        self
    }

    /// Registers a handler together with its message template.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        handler: HandlerDefinition,
        message: impl Into<String>,
    ) -> &mut Self {
        let name = name.into();
        self.set_message(name.clone(), message);
        self.set(name, handler)
    }
}

type Seed = Arc<dyn Fn(&mut HandlerTable) + Send + Sync>;

/// Shared handler/message registry.
///
/// Clones share state: a handler set through one clone is visible through
/// every other. [`Registry::reset`] restores the state produced by the seed
/// function the registry was created with.
///
/// # Example
///
/// ```rust
/// use rules_core::{CapabilityProvider, HandlerDefinition, Registry};
///
/// let registry = Registry::with_seed(|table| {
///     table.define(
///         "digits",
///         HandlerDefinition::pattern("^[0-9]+$").unwrap(),
///         "must contain only digits",
///     );
/// });
///
/// assert!(registry.has("digits"));
/// assert_eq!(registry.message("digits").as_deref(), Some("must contain only digits"));
///
/// registry.set("even", HandlerDefinition::predicate(|v, _, _| {
///     Ok(v.as_i64().is_some_and(|n| n % 2 == 0))
/// }));
/// registry.reset();
/// assert!(!registry.has("even"));
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    table: Arc<RwLock<HandlerTable>>,
    seed: Option<Seed>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry populated by `seed`; `reset` re-runs it.
    pub fn with_seed<F>(seed: F) -> Self
    where
        F: Fn(&mut HandlerTable) + Send + Sync + 'static,
    {
        let mut table = HandlerTable::default();
        seed(&mut table);
        Self {
            table: Arc::new(RwLock::new(table)),
            seed: Some(Arc::new(seed)),
        }
    }

    /// Registers or replaces a handler. Last write wins.
    pub fn set(&self, name: impl Into<String>, handler: HandlerDefinition) {
        let name = name.into();
        debug!("Registering handler '{}' ({})", name, handler.kind());
        self.table.write().set(name, handler);
    }

    /// Registers several handlers.
    pub fn set_all<I, S>(&self, handlers: I)
    where
        I: IntoIterator<Item = (S, HandlerDefinition)>,
        S: Into<String>,
    {
        let mut table = self.table.write();
        for (name, handler) in handlers {
            table.set(name, handler);
        }
    }

    /// Bulk handler update: merges when `append`, replaces everything otherwise.
    pub fn handlers(&self, handlers: IndexMap<String, HandlerDefinition>, append: bool) {
        let mut table = self.table.write();
        if append {
            table.handlers.extend(handlers);
        } else {
            table.handlers = handlers;
        }
    }

    /// Snapshot of every registered handler.
    pub fn handler_table(&self) -> IndexMap<String, HandlerDefinition> {
        self.table.read().handlers.clone()
    }

    /// Registers or replaces a message template.
    pub fn set_message(&self, name: impl Into<String>, text: impl Into<String>) {
        self.table.write().set_message(name, text);
    }

    /// Bulk message update; returns the resulting message table.
    ///
    /// Merges when `append`, replaces everything otherwise.
    pub fn messages(
        &self,
        messages: IndexMap<String, String>,
        append: bool,
    ) -> IndexMap<String, String> {
        let mut table = self.table.write();
        if append {
            table.messages.extend(messages);
        } else {
            table.messages = messages;
        }
        table.messages.clone()
    }

    /// Snapshot of every registered message template.
    pub fn message_table(&self) -> IndexMap<String, String> {
        self.table.read().messages.clone()
    }

    /// Runs a handler; same semantics as [`crate::check`].
    pub fn check<'a>(
        &self,
        value: &'a Value,
        handler: &'a HandlerDefinition,
        options: &'a RuleOptions,
        out: &'a mut OutParams,
    ) -> BoxFuture<'a, Result<bool>> {
        crate::check(value, handler, options, out)
    }

    /// Restores the seeded state, or empties an unseeded registry.
    pub fn reset(&self) {
        let mut table = HandlerTable::default();
        if let Some(seed) = &self.seed {
            seed(&mut table);
        }
        debug!("Registry reset to {} handler(s)", table.handlers.len());
        *self.table.write() = table;
    }
}

impl CapabilityProvider for Registry {
    fn has(&self, name: &str) -> bool {
        self.table.read().handlers.contains_key(name)
    }

    fn handler(&self, name: &str) -> Option<HandlerDefinition> {
        self.table.read().handlers.get(name).cloned()
    }

    fn message(&self, name: &str) -> Option<String> {
        self.table.read().messages.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.table.read().handlers.keys().cloned().collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.read();
        f.debug_struct("Registry")
            .field("handlers", &table.handlers.keys().collect::<Vec<_>>())
            .field("messages", &table.messages.len())
            .field("seeded", &self.seed.is_some())
            .finish()
    }
}
