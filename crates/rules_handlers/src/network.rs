//! Address handlers: email, url and ip.

use rules_core::{HandlerDefinition, HandlerTable};
use serde_json::Value;
use std::net::{Ipv4Addr, Ipv6Addr};
use validator::{ValidateEmail, ValidateUrl};

pub(crate) fn install(table: &mut HandlerTable) {
    table
        .define(
            "email",
            HandlerDefinition::predicate(|v, _, _| Ok(v.as_str().is_some_and(|s| s.validate_email()))),
            "must be a valid email address",
        )
        .define(
            "url",
            HandlerDefinition::predicate(|v, _, _| Ok(v.as_str().is_some_and(|s| s.validate_url()))),
            "must be a valid url",
        )
        .define(
            "ip",
            HandlerDefinition::format_set([
                ("ipv4", HandlerDefinition::predicate(|v, _, _| Ok(parses::<Ipv4Addr>(v)))),
                ("ipv6", HandlerDefinition::predicate(|v, _, _| Ok(parses::<Ipv6Addr>(v)))),
            ]),
            "must be a valid ip address",
        );
}

fn parses<T: std::str::FromStr>(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.parse::<T>().is_ok())
}
