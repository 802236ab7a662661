//! suiteload CLI - load test suites, expand parameters and print the result
//!
//! Suites are printed to stdout as JSON; logs go to stderr and honour `RUST_LOG`.

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use suiteload::{
    expand_parameters, parameter_map, write_suites, OutputFormat, ParserRegistry, SuiteLoader,
    SuiteloadConfig,
};

#[derive(Parser)]
#[command(name = "suiteload")]
#[command(version, about = "Load declarative test suites and expand ${name} parameters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load suites from a file or directory and print them
    Load {
        /// Suite file or directory (overrides test_suites from the config file)
        path: Option<PathBuf>,

        /// Parameter substitution, repeatable (e.g. -p date=2024-01-01)
        #[arg(short, long = "parameter", value_name = "NAME=VALUE")]
        parameters: Vec<String>,

        /// Output format (overrides output from the config file)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Path to a YAML config file (default: $SUITELOAD_CONFIG)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the registered parser formats
    Parsers,
}

fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Load { path, parameters, format, config } => {
            load_suites(path, parameters, format, config)
        }
        Commands::Parsers => list_parsers(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Load, expand and print suites
fn load_suites(
    path: Option<PathBuf>,
    parameters: Vec<String>,
    format: Option<OutputFormat>,
    config: Option<PathBuf>,
) -> Result<(), String> {
    let mut settings = match config {
        Some(config_path) => SuiteloadConfig::from_file(&config_path),
        None => SuiteloadConfig::from_env(),
    }
    .map_err(|e| e.to_string())?;

    let overrides = parameter_map(&parameters).map_err(|e| e.to_string())?;
    settings.merge_parameters(overrides);

    let path = path.or(settings.test_suites);
    let format = format.unwrap_or(settings.output);

    let loader = SuiteLoader::new();
    let mut suites = loader.load(path.as_deref()).map_err(|e| e.to_string())?;

    let params = (!settings.parameters.is_empty()).then_some(&settings.parameters);
    expand_parameters(&mut suites, params);

    let stdout = io::stdout();
    write_suites(stdout.lock(), &suites, format)
        .map_err(|e| format!("Failed to write suites: {}", e))
}

/// Print registered parser names, one per line
fn list_parsers() -> Result<(), String> {
    let registry = ParserRegistry::discover();
    for name in registry.names() {
        println!("{}", name);
    }
    Ok(())
}
