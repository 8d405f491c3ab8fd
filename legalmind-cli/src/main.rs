//! LegalMind CLI: multi-model legal document risk analysis.
//!
//! Analyze a document with one model, or fan the same document out to up to
//! four models and compare their findings.

mod commands;

use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// LegalMind: AI-powered legal document analysis
#[derive(Parser, Debug)]
#[command(name = "legalmind", version, about, long_about = None)]
struct Cli {
    /// Document file to analyze with the default model
    document: Option<PathBuf>,

    /// LLM model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Analysis depth: quick, comprehensive, focused
    #[arg(long)]
    depth: Option<String>,

    /// Focus area to emphasize (repeatable)
    #[arg(long)]
    focus: Vec<String>,

    /// Emit raw JSON instead of a formatted report
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Analyze a document with a single model
    Analyze {
        /// Document file to analyze
        document: PathBuf,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Analysis depth: quick, comprehensive, focused
        #[arg(long)]
        depth: Option<String>,

        /// Focus area to emphasize (repeatable)
        #[arg(long)]
        focus: Vec<String>,

        /// Emit raw JSON instead of a formatted report
        #[arg(long)]
        json: bool,
    },
    /// Analyze a document with several models side by side
    Compare {
        /// Document file to analyze
        document: PathBuf,

        /// Model to include in the comparison (repeatable, up to 4)
        #[arg(short, long = "model", required = true)]
        models: Vec<String>,

        /// Analysis depth: quick, comprehensive, focused
        #[arg(long)]
        depth: Option<String>,

        /// Focus area to emphasize (repeatable)
        #[arg(long)]
        focus: Vec<String>,

        /// Emit raw JSON instead of a formatted report
        #[arg(long)]
        json: bool,
    },
    /// List the known model catalog
    Models {
        /// Only list models whose provider API key resolves
        #[arg(long)]
        available: bool,

        /// Emit raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file into the workspace
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Human-readable layer for stderr (always active)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "legalmind", "legalmind")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "legalmind.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    // Handle subcommands
    if let Some(command) = cli.command {
        return commands::handle_command(command, &workspace).await;
    }

    // Bare document path: single-model analysis with the top-level flags
    if let Some(document) = cli.document {
        return commands::handle_command(
            Commands::Analyze {
                document,
                model: cli.model,
                depth: cli.depth,
                focus: cli.focus,
                json: cli.json,
            },
            &workspace,
        )
        .await;
    }

    Cli::command().print_help()?;
    println!();
    Ok(())
}
