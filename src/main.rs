//! pombranch CLI entry point
//!
//! Parses the command line, sets up logging, runs the command and turns failures
//! into a readable error with a non-zero exit code.

use anyhow::Result;
use clap::Parser;
use pombranch::cli;
use pombranch::core::user_friendly_error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = cli.build_config();

    // RUST_LOG wins over the verbosity flags
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => Some(EnvFilter::from_default_env()),
        Err(_) => config.log_level.as_deref().map(EnvFilter::new),
    };
    if let Some(filter) = filter {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(!config.no_color)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute_with_config(config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
