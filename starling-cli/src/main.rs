//! Starling CLI - Command line interface for Starling
//!
//! Batch code review of source files with locally running LLM processes.

mod commands;

use clap::{Parser, Subcommand};
use starling_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ReviewArgs, ServeArgs};

/// Starling: code review of uploaded files with local LLMs
#[derive(Parser, Debug)]
#[command(name = "starling")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to ollama executable (overrides config and env)
    #[arg(long, global = true, env = "STARLING_OLLAMA_PATH")]
    ollama_path: Option<String>,

    /// Model to use (overrides config and env)
    #[arg(long, global = true, env = "STARLING_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Run the review HTTP server
    #[command(visible_alias = "s")]
    Serve(ServeArgs),

    /// Review files from the command line
    #[command(visible_alias = "r")]
    Review(ReviewArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.ollama_path.clone(), cli.model.clone())?;

    if cli.verbose {
        tracing::info!(
            ollama_path = %config.runner.ollama_path,
            model = %config.runner.default_model,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("starling {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Review(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Config) => {
            println!("Starling Configuration");
            println!("======================");
            println!();
            println!("Runner Settings:");
            println!("  ollama_path: {}", config.runner.ollama_path);
            println!("  default_model: {}", config.runner.default_model);
            println!(
                "  max_concurrent_reviews: {}",
                config.runner.max_concurrent_reviews
            );
            match config.runner.timeout {
                Some(t) => println!("  timeout: {:?}", t),
                None => println!("  timeout: (none)"),
            }
            println!();
            println!("Server Settings:");
            println!("  host: {}", config.server.host);
            println!("  port: {}", config.server.port);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Starling - code review of uploaded files with local LLMs");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
