use colored::Colorize;
use rules_validator::ErrorCollector;
use serde_json::json;

pub fn print_validation_report(passed: bool, errors: &ErrorCollector, format: &str) {
    match format {
        "json" => print_json_report(passed, errors),
        _ => print_text_report(passed, errors),
    }
}

fn print_text_report(passed: bool, errors: &ErrorCollector) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if passed {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for (key, messages) in errors.iter() {
            println!("  {}", key.bold());
            for message in messages {
                println!("    - {}", message.red());
            }
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Fields with errors: {}", errors.len());
    println!("  Total messages:     {}", errors.message_count());
    println!("{}", "═".repeat(60));
}

fn print_json_report(passed: bool, errors: &ErrorCollector) {
    let output = json!({
        "passed": passed,
        "errors": errors.to_json(),
        "summary": {
            "field_count": errors.len(),
            "message_count": errors.message_count(),
        }
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
    );
}

/// One-line status shown around the report.
#[derive(Debug, Clone, Copy)]
pub enum Status {
    Ok,
    Failed,
    Note,
}

/// Prints a status line; failures go to stderr.
pub fn status(kind: Status, message: &str) {
    match kind {
        Status::Ok => println!("{} {}", "✓".green().bold(), message.green()),
        Status::Failed => eprintln!("{} {}", "✗".red().bold(), message.red()),
        Status::Note => println!("{} {}", "ℹ".blue().bold(), message),
    }
}
