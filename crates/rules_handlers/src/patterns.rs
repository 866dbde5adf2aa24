//! Regular-expression handlers.

use regex::Regex;
use rules_core::{HandlerDefinition, HandlerTable};

fn pattern(re: &str) -> HandlerDefinition {
    HandlerDefinition::Pattern(Regex::new(re).expect("built-in pattern is valid"))
}

pub(crate) fn install(table: &mut HandlerTable) {
    table
        .set("alpha", pattern(r"^[a-zA-Z]+$"))
        .set("alphaNumeric", pattern(r"^[a-zA-Z0-9]+$"))
        .set("numeric", pattern(r"^[-+]?[0-9]+(\.[0-9]+)?$"))
        .set("hex", pattern(r"^(0x)?[0-9a-fA-F]+$"))
        .set("slug", pattern(r"^[a-z0-9]+(-[a-z0-9]+)*$"))
        .define(
            "uuid",
            pattern(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"),
            "must be a valid uuid",
        );
}
