//! End-to-end validation against the built-in handler registry.
//!
//! Covers the observable contract: required semantics, negation, format-set
//! selection, message templating, event filtering and message ordering.

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use rules_core::{HandlerDefinition, RuleDeclaration, RuleError, RuleOptions};
use rules_validator::Validator;
use serde_json::{json, Value};

fn decl(value: Value) -> RuleDeclaration {
    RuleDeclaration::from_value(value).expect("valid declaration")
}

fn validator() -> Validator {
    Validator::new(rules_handlers::registry())
}

#[tokio::test]
async fn test_required_field_missing() {
    let mut validator = validator();
    validator.rule("title", "not:empty");

    let passed = validator.validate(&json!({})).await.unwrap();

    assert!(!passed);
    assert_eq!(validator.errors().to_json(), json!({"title": ["is required"]}));
}

#[tokio::test]
async fn test_required_field_present_but_empty() {
    let mut validator = validator();
    validator.rule("title", "not:empty");

    let passed = validator.validate(&json!({"title": ""})).await.unwrap();

    assert!(!passed);
    assert_eq!(
        validator.errors().to_json(),
        json!({"title": ["must not be a empty"]})
    );
}

#[tokio::test]
async fn test_negation_inverts_result() {
    for value in [json!("x"), json!(""), json!(null), json!([]), json!(3)] {
        let mut plain = validator();
        plain.rule("v", "empty");
        let mut negated = validator();
        negated.rule("v", "not:empty");

        let data = json!({"v": value});
        assert_eq!(
            plain.validate(&data).await.unwrap(),
            !negated.validate(&data).await.unwrap(),
            "negation mismatch for {value}"
        );
    }
}

#[tokio::test]
async fn test_wildcard_errors_are_keyed_by_resolved_path() {
    let mut validator = validator();
    validator.rule("emails.*", "email");

    let data = json!({"emails": ["a@a.com", "nope", "b@b.com", "also nope"]});
    assert!(!validator.validate(&data).await.unwrap());

    let keys: Vec<_> = validator.errors().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["emails.1", "emails.3"]);
    assert_eq!(
        validator.first_error("emails.1"),
        Some("must be a valid email address")
    );
}

#[tokio::test]
async fn test_wildcard_over_missing_collection_is_required() {
    let mut validator = validator();
    validator.rule("emails.*", "email");

    assert!(!validator.validate(&json!({"emails": null})).await.unwrap());
    assert_eq!(validator.first_error("emails.*"), Some("is required"));

    assert!(!validator.validate(&json!({"emails": []})).await.unwrap());
    assert_eq!(validator.first_error("emails.*"), Some("is required"));
}

#[tokio::test]
async fn test_format_set_selection() {
    let mut validator = validator();
    validator.set(
        "pair",
        HandlerDefinition::format_set([
            ("a", HandlerDefinition::predicate(|_, _, _| Ok(false))),
            ("b", HandlerDefinition::predicate(|_, _, _| Ok(true))),
        ]),
    );
    validator.rule("any", decl(json!({"pair": {"check": "any"}})));
    validator.rule("only_a", decl(json!({"pair": {"check": "a"}})));
    validator.rule("list_b", decl(json!({"pair": {"check": ["b"]}})));

    let data = json!({"any": 1, "only_a": 1, "list_b": 1});
    assert!(!validator.validate(&data).await.unwrap());

    let keys: Vec<_> = validator.errors().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["only_a"]);
}

#[tokio::test]
async fn test_ip_format_alias() {
    let mut validator = validator();
    validator.rule("addr", decl(json!({"ip": {"format": "ipv4"}})));

    assert!(validator.validate(&json!({"addr": "127.0.0.1"})).await.unwrap());
    assert!(!validator.validate(&json!({"addr": "::1"})).await.unwrap());
    assert_eq!(
        validator.first_error("addr"),
        Some("must be a valid ip address")
    );
}

#[tokio::test]
async fn test_message_templating() {
    let mut validator = validator();
    validator.rule("name", decl(json!({"length": {"min": 1, "max": 7}})));

    validator
        .validate(&json!({"name": "Bartholomew"}))
        .await
        .unwrap();
    assert_eq!(
        validator.first_error("name"),
        Some("must be between 1 and 7 character long")
    );
}

#[tokio::test]
async fn test_custom_message_with_field_placeholder() {
    let mut validator = validator();
    validator.rule(
        "tags.*",
        decl(json!({"alpha": "${field} must be letters, got a ${rule} failure"})),
    );

    validator.validate(&json!({"tags": ["ok", "n0"]})).await.unwrap();
    assert_eq!(
        validator.first_error("tags.1"),
        Some("tags.1 must be letters, got a alpha failure")
    );
}

#[tokio::test]
async fn test_out_params_reach_message() {
    let mut validator = validator();
    validator.rule("starts", decl(json!({"dateAfter": {"date": "2024-01-01"}})));

    validator
        .validate(&json!({"starts": "2023-06-01"}))
        .await
        .unwrap();
    assert_eq!(
        validator.first_error("starts"),
        Some("must be after 2024-01-01T00:00:00+00:00")
    );
}

#[tokio::test]
async fn test_missing_mandatory_option_surfaces_as_error() {
    let mut validator = validator();
    validator.rule("starts", "dateAfter");

    let err = validator
        .validate(&json!({"starts": "2023-06-01"}))
        .await
        .unwrap_err();
    assert!(matches!(err, RuleError::MissingOption { .. }));
}

#[tokio::test]
async fn test_event_filtering() {
    let mut validator = validator();
    validator.rule("password", decl(json!({"not:empty": {"on": "create"}})));

    let data = json!({"password": ""});
    assert!(!validator.validate_on(&data, &["create"]).await.unwrap());
    assert_eq!(validator.errors().len(), 1);

    assert!(validator.validate_on(&data, &["update"]).await.unwrap());
    assert!(validator.errors().is_empty());

    // Without active events every rule runs.
    assert!(!validator.validate(&data).await.unwrap());
}

#[tokio::test]
async fn test_multi_rule_message_order() {
    let mut validator = validator();
    validator.rule(
        "code",
        decl(json!([
            {"numeric": "must be numeric"},
            {"length": {"min": 5, "message": "must have at least ${min} characters"}}
        ])),
    );

    validator.validate(&json!({"code": "ab"})).await.unwrap();
    assert_eq!(
        validator.errors_for("code").unwrap(),
        ["must be numeric", "must have at least 5 characters"]
    );
}

#[tokio::test]
async fn test_rules_for_several_fields_collect_in_one_pass() {
    let mut rules = IndexMap::new();
    rules.insert("email".to_string(), decl(json!("email")));
    rules.insert("age".to_string(), decl(json!({"between": {"min": 18, "max": 130}})));
    rules.insert("card".to_string(), decl(json!("creditCard")));

    let mut validator = validator();
    validator.rules(rules);

    let data = json!({"email": "x", "age": 12, "card": "4111 1111 1111 1111"});
    assert!(!validator.validate(&data).await.unwrap());

    assert_eq!(
        validator.errors().to_json(),
        json!({
            "email": ["must be a valid email address"],
            "age": ["must be between 18 and 130"]
        })
    );
}

#[tokio::test]
async fn test_skip_null_and_skip_empty() {
    let mut validator = validator();
    validator.rule("nickname", decl(json!({"alpha": {"skipNull": true}})));
    validator.rule("bio", decl(json!({"length": {"min": 10, "skipEmpty": true}})));

    assert!(
        validator
            .validate(&json!({"nickname": null, "bio": ""}))
            .await
            .unwrap()
    );

    assert!(
        !validator
            .validate(&json!({"nickname": "n1ck", "bio": "short"}))
            .await
            .unwrap()
    );
    assert_eq!(validator.errors().len(), 2);
}

#[tokio::test]
async fn test_local_overrides_do_not_touch_shared_registry() {
    let registry = rules_handlers::registry();

    let mut local = Validator::new(registry.clone());
    local.set("email", HandlerDefinition::predicate(|_, _, _| Ok(true)));
    local.set_message("required", "needed");
    local.rule("email", "email");
    local.rule("name", "string");

    assert!(!local.validate(&json!({"email": "nope"})).await.unwrap());
    assert_eq!(local.errors().to_json(), json!({"name": ["needed"]}));

    let mut fresh = Validator::new(registry);
    fresh.rule("email", "email");
    fresh.rule("name", "string");
    fresh.validate(&json!({"email": "nope"})).await.unwrap();
    assert_eq!(
        fresh.errors().to_json(),
        json!({"email": ["must be a valid email address"], "name": ["is required"]})
    );
}

#[tokio::test]
async fn test_async_handler_in_validation() {
    let mut validator = validator();
    validator.set(
        "available",
        HandlerDefinition::async_predicate(|value, _| async move {
            tokio::task::yield_now().await;
            Ok(value != json!("taken"))
        }),
    );
    validator.set_message("available", "${field} is already taken");
    validator.rule("users.*.login", decl(json!(["alphaNumeric", "available"])));

    let data = json!({"users": [{"login": "free"}, {"login": "taken"}]});
    assert!(!validator.validate(&data).await.unwrap());
    assert_eq!(
        validator.errors().to_json(),
        json!({"users.1.login": ["users.1.login is already taken"]})
    );
}

#[tokio::test]
async fn test_whole_value_rule_with_empty_path() {
    let mut validator = validator();
    validator.rule("", "object");

    assert!(validator.validate(&json!({"title": "x"})).await.unwrap());
    assert!(!validator.validate(&json!("text")).await.unwrap());
    assert_eq!(validator.first_error("0"), Some("must be a object"));
}

#[tokio::test]
async fn test_optional_rules() {
    let mut validator = validator();
    validator.rule(
        "website",
        RuleDeclaration::with_options("url", RuleOptions::new().required(false)),
    );

    assert!(validator.validate(&json!({})).await.unwrap());
    assert!(!validator.validate(&json!({"website": "nope"})).await.unwrap());
}
