use anyhow::{Context, Result};
use rules_parser::{parse_data_file, parse_file};
use rules_validator::Validator;
use std::path::Path;
use tracing::info;

use crate::output::{self, Status};

pub async fn execute(rules_path: &str, data_path: &str, events: &[String], format: &str) -> Result<()> {
    info!("Validating {} against {}", data_path, rules_path);
    if !events.is_empty() {
        info!("Active events: {}", events.join(", "));
    }

    let file = parse_file(Path::new(rules_path))
        .with_context(|| format!("Failed to parse rule file: {}", rules_path))?;
    let data = parse_data_file(Path::new(data_path))
        .with_context(|| format!("Failed to parse data file: {}", data_path))?;

    let mut validator = Validator::new(rules_handlers::registry());
    validator.rules(file.rules);
    validator.messages(file.messages, true);
    validator.set_meta(file.meta);

    if format != "json" {
        output::status(Status::Note, &format!(
            "Rules loaded: {} rule(s) on {} field(s)",
            validator.rule_set().records().count(),
            validator.rule_set().len()
        ));
    }

    let passed = validator
        .validate_on(&data, events)
        .await
        .context("Validation could not run")?;

    output::print_validation_report(passed, validator.errors(), format);

    if !passed {
        std::process::exit(1);
    }

    Ok(())
}
