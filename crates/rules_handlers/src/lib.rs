//! # Built-in Handlers
//!
//! The default capability provider for the Rule Validation Engine. It supplies
//! the named checks rules refer to (`email`, `length`, `ip`, `dateAfter`, ...)
//! together with their message templates.
//!
//! ## Example
//!
//! ```rust
//! use rules_core::CapabilityProvider;
//!
//! let registry = rules_handlers::registry();
//! assert!(registry.has("email"));
//! assert_eq!(registry.message("required").as_deref(), Some("is required"));
//! ```

mod compare;
mod dates;
mod network;
mod numbers;
mod patterns;
mod types;

use rules_core::{HandlerTable, Registry, DEFAULT_MESSAGE_KEY, REQUIRED_MESSAGE_KEY};

pub use dates::parse_date;
pub use numbers::luhn;

/// Message used when a handler has no template of its own.
pub const DEFAULT_MESSAGE: &str = "must ${not}be a ${rule}";

/// Message used when a required field is missing.
pub const REQUIRED_MESSAGE: &str = "is required";

/// Creates a registry seeded with every built-in handler.
///
/// `Registry::reset` on the returned handle restores exactly this state.
pub fn registry() -> Registry {
    Registry::with_seed(install)
}

/// Registers every built-in handler and message into `table`.
pub fn install(table: &mut HandlerTable) {
    table
        .set_message(DEFAULT_MESSAGE_KEY, DEFAULT_MESSAGE)
        .set_message(REQUIRED_MESSAGE_KEY, REQUIRED_MESSAGE);

    types::install(table);
    patterns::install(table);
    network::install(table);
    numbers::install(table);
    compare::install(table);
    dates::install(table);
}


#[cfg(test)]
mod tests {
    use super::*;
    use rules_core::{CapabilityProvider, HandlerDefinition};

    #[test]
    fn test_registry_has_builtins() {
        let registry = registry();
        for name in [
            "empty",
            "string",
            "alphaNumeric",
            "email",
            "url",
            "ip",
            "creditCard",
            "luhn",
            "length",
            "between",
            "in",
            "equals",
            "matches",
            "date",
            "dateAfter",
            "dateBefore",
        ] {
            assert!(registry.has(name), "missing built-in '{name}'");
        }
        assert_eq!(registry.default_message(), DEFAULT_MESSAGE);
    }

    #[test]
    fn test_reset_restores_builtins() {
        let registry = registry();
        registry.set("email", HandlerDefinition::predicate(|_, _, _| Ok(true)));
        registry.set("custom", HandlerDefinition::predicate(|_, _, _| Ok(true)));

        registry.reset();

        assert!(!registry.has("custom"));
        assert!(matches!(
            registry.handler("email"),
            Some(HandlerDefinition::Predicate(_))
        ));
        assert_eq!(registry.names().len(), super::registry().names().len());
    }

    #[test]
    fn test_registries_are_independent() {
        let first = registry();
        let second = registry();
        first.set("only_here", HandlerDefinition::predicate(|_, _, _| Ok(true)));
        assert!(!second.has("only_here"));
    }
}
