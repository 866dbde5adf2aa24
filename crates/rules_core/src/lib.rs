//! # Rule Validation Core
//!
//! Core types and algorithms for validating structured data against named
//! rules.
//!
//! ## Key Concepts
//!
//! - **Handler**: a named check: a predicate, a regular expression, or a
//!   format set of named alternatives
//! - **Rule**: a handler applied to a field path, with options
//! - **Path**: a dotted field path where `*` expands to every key or index
//! - **Provider**: the registry that supplies handlers and message templates
//!
//! ## Example
//!
//! ```rust
//! use rules_core::{check, resolve, HandlerDefinition, OutParams, RuleOptions};
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let data = json!({"codes": ["ab", "c1"]});
//! let letters = HandlerDefinition::pattern("^[a-z]+$").unwrap();
//!
//! let mut failed = Vec::new();
//! for (key, value) in resolve(&data, "codes.*") {
//!     let mut out = OutParams::new();
//!     if !check(value, &letters, &RuleOptions::default(), &mut out).await.unwrap() {
//!         failed.push(key);
//!     }
//! }
//! assert_eq!(failed, vec!["codes.1"]);
//! # });
//! ```

pub mod error;
pub mod executor;
pub mod handler;
pub mod message;
pub mod path;
pub mod registry;
pub mod rule;
pub mod ruleset;

pub use error::*;
pub use executor::*;
pub use handler::*;
pub use message::*;
pub use path::*;
pub use registry::*;
pub use rule::*;
pub use ruleset::*;
