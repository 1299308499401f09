//! Main entry point for the Sarvam document translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod core;
mod processors;
mod server;

use cli::commands::Commands;

/// Sarvam Document Translator - translate Word documents via the Sarvam API
#[derive(Parser, Debug)]
#[command(name = "sarvam-doc-translator", version, about, long_about = None)]
struct Args {
    /// API key for Sarvam (optional, defaults to SARVAM_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}={}", env!("CARGO_CRATE_NAME"), log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        std::env::set_var("SARVAM_API_KEY", api_key);
    }

    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    // Execute command
    match args.command {
        Some(Commands::Doc {
            file,
            output,
            source_lang,
            target_lang,
            recursive,
        }) => {
            cli::commands::handle_doc(file, output, source_lang, target_lang, recursive).await?;
        }
        Some(Commands::Server { host, port, debug }) => {
            cli::commands::handle_server(host, port, debug).await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
