//! # Rule Validation Engine
//!
//! Runs declared rules against structured data and collects per-field error
//! messages:
//!
//! - Rules are evaluated field by field, in declaration order
//! - Wildcard paths (`emails.*`) are checked once per resolved value
//! - Missing required fields record a single `required` message
//! - Rules restricted to events (`on`) only run when one of them is active
//!
//! ## Example
//!
//! ```rust
//! use rules_core::{HandlerDefinition, Registry};
//! use rules_validator::Validator;
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let registry = Registry::with_seed(|table| {
//!     table.set_message("_default_", "must be a ${rule}");
//!     table.set("word", HandlerDefinition::pattern("^[a-z]+$").unwrap());
//! });
//!
//! let mut validator = Validator::new(registry);
//! validator.rule("tags.*", "word");
//!
//! let passed = validator
//!     .validate(&json!({"tags": ["rust", "C++"]}))
//!     .await
//!     .unwrap();
//!
//! assert!(!passed);
//! assert_eq!(validator.first_error("tags.1"), Some("must be a word"));
//! # });
//! ```

mod collector;
mod config;
mod engine;

pub use collector::*;
pub use config::*;
pub use engine::*;
