mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rve")]
#[command(version, about = "Rule Validation Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a data document against a rule file
    Validate {
        /// Path to the rule file (YAML, TOML or JSON)
        rules: String,

        /// Path to the data document (JSON, YAML or TOML)
        data: String,

        /// Active event tag; repeat to activate several
        #[arg(long = "on", value_name = "TAG")]
        events: Vec<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check a rule file without validating data
    Check {
        /// Path to the rule file (YAML, TOML or JSON)
        rules: String,
    },

    /// List the built-in handlers
    Handlers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .init();

    match cli.command {
        Commands::Validate {
            rules,
            data,
            events,
            format,
        } => commands::validate::execute(&rules, &data, &events, &format).await,

        Commands::Check { rules } => commands::check::execute(&rules).await,

        Commands::Handlers => commands::handlers::execute(),
    }
}
