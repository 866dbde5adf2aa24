use anyhow::{Context, Result};
use rules_parser::parse_file;
use rules_validator::Validator;
use std::path::Path;
use tracing::info;

use crate::output::{self, Status};

pub async fn execute(rules_path: &str) -> Result<()> {
    info!("Checking rule file: {}", rules_path);

    let path = Path::new(rules_path);
    let file = parse_file(path)
        .with_context(|| format!("Failed to parse rule file: {}", rules_path))?;

    let mut validator = Validator::new(rules_handlers::registry());
    validator.rules(file.rules);
    validator.messages(file.messages, true);

    let rules = validator.rule_set();
    output::status(Status::Note, &format!(
        "Rule file loaded: {} rule(s) on {} field(s)",
        rules.records().count(),
        rules.len()
    ));

    // Every referenced handler must resolve before the file is usable
    let mut unknown = Vec::new();
    for record in rules.records() {
        if !validator.has(&record.handler) && !unknown.contains(&record.handler) {
            unknown.push(record.handler.clone());
        }
    }

    println!("\nRule Summary:");
    for (field, records) in rules.iter() {
        let names: Vec<String> = records.iter().map(|r| r.declared_name()).collect();
        println!("  {:<24} {}", field, names.join(", "));
    }

    if !unknown.is_empty() {
        output::status(
            Status::Failed,
            &format!("Unknown handler(s): {}", unknown.join(", ")),
        );
        std::process::exit(1);
    }

    output::status(Status::Ok, "Rule file is valid");
    Ok(())
}
