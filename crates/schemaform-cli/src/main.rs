//! schemaform CLI
//!
//! Command-line tool for checking form schemas and validating submissions.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use schemaform::{FormSchema, FormValidator, FormValues};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

/// Schema-driven form validation.
#[derive(Parser)]
#[command(name = "schemaform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Form schema file (JSON).
    #[arg(short, long, env = "SCHEMAFORM_SCHEMA")]
    schema: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the schema and report its fields.
    Check,

    /// Validate a submission against the schema.
    Validate {
        /// Submitted values (JSON object).
        #[arg(long)]
        values: PathBuf,

        /// Report every failing field instead of the first one.
        #[arg(long)]
        all: bool,
    },

    /// Print the values a fresh form starts with.
    Init,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let schema = FormSchema::from_path(&cli.schema)
        .with_context(|| format!("loading schema {}", cli.schema.display()))?;
    debug!(path = %cli.schema.display(), "schema loaded");

    let validator = FormValidator::new(&schema)?;

    match cli.command {
        Commands::Check => {
            check(&schema);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate { values, all } => {
            let values = read_values(&values)?;
            if all {
                let errors = validator.errors(&values);
                if errors.is_empty() {
                    println!("valid");
                    return Ok(ExitCode::SUCCESS);
                }
                print!("{errors}");
                Ok(ExitCode::FAILURE)
            } else {
                match validator.validate(&values) {
                    Ok(()) => {
                        println!("valid");
                        Ok(ExitCode::SUCCESS)
                    }
                    Err(err) => {
                        println!("{}: {err}", err.field().unwrap_or("-"));
                        Ok(ExitCode::FAILURE)
                    }
                }
            }
        }

        Commands::Init => {
            let initial = validator.initial_values();
            println!("{}", serde_json::to_string_pretty(&initial)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(schema: &FormSchema) {
    info!(
        "{} sections, {} fields",
        schema.sections.len(),
        schema.fields().count()
    );
    for section in &schema.sections {
        info!("  {} ({} fields)", section.name, section.fields.len());
    }

    let unchecked: Vec<&str> = schema
        .fields()
        .filter(|f| !f.field_type.generates_rules())
        .map(|f| f.name.as_str())
        .collect();
    if !unchecked.is_empty() {
        info!("Fields without generated rules: {}", unchecked.join(", "));
    }
}

fn read_values(path: &Path) -> anyhow::Result<FormValues> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading values {}", path.display()))?;
    let values: FormValues = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a JSON object", path.display()))?;
    Ok(values)
}
