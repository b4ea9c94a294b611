//! Soundboard CLI binary.
//!
//! Drives the same cache operations a chat command handler would:
//! - List, look up and search sounds
//! - Fetch a sound's audio into the local shadow directory
//! - Add and delete sounds
//! - Invalidate the metadata snapshot

use clap::Parser;
use soundboard::{LogFormat, SoundboardConfig, build_cache, init_telemetry};
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    use cli::{Cli, handle_command, report_error};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Load .env before reading configuration
    let _ = dotenvy::dotenv();

    // Initialize tracing
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    let directive = if cli.verbose { "debug" } else { "warn" };
    if let Err(e) = init_telemetry(format, directive) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let Cli {
        command, config, ..
    } = cli;
    let result = async {
        let config = SoundboardConfig::load(config.as_deref())?;
        let cache = build_cache(&config).await?;
        handle_command(&cache, command).await
    }
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}
