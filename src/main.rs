//! Lureforge CLI entry point.

use clap::Parser;

use lureforge::cli::{self, Cli, Commands};
use lureforge::infrastructure::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging level comes from the config file the command will use, so
    // resolve it up front; fall back to defaults if loading fails (the
    // command itself will surface the load error).
    let logging_config = match &cli.command {
        Commands::Run { config, .. } | Commands::Config { config } => {
            cli::load_config(config.as_deref())
                .map(|c| c.logging)
                .unwrap_or_default()
        }
    };
    if let Err(err) = logging::init(&logging_config) {
        eprintln!("warning: failed to initialize logging: {err}");
    }

    if let Err(err) = cli::execute(cli).await {
        tracing::error!(error = %err, "command failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
