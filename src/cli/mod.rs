//! Command-line interface.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::AutonomousService;
use crate::domain::models::{Config, SimulationRequest};
use crate::infrastructure::api::{
    AgentConversationClient, ApiContext, ChannelApiClient, PlatformDirectoryClient,
    VoiceGatewayClient,
};
use crate::infrastructure::config::ConfigLoader;
use crate::services::channels::{
    ChannelProfile, ContentChannelHandler, VishingHandler, PHISHING, SMISHING, TRAINING,
};
use crate::services::termination::SessionTerminator;

#[derive(Parser, Debug)]
#[command(name = "lureforge", version, about = "Attack simulation orchestration engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit the final report as compact JSON on stdout
    #[arg(long, global = true)]
    pub compact: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a simulation request read from a JSON file (or stdin with `-`)
    Run {
        /// Path to the request JSON, or `-` for stdin
        request: PathBuf,

        /// Override the config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective configuration after merging all sources
    Config {
        /// Override the config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Load configuration from an explicit path or the default hierarchy.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Read and parse a request document from a file or stdin.
pub fn read_request(path: &Path) -> Result<SimulationRequest> {
    let raw = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read request from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request from {}", path.display()))?
    };
    serde_json::from_str(&raw).context("Request is not a valid simulation request document")
}

/// Wire the HTTP adapters and channel handlers for one invocation.
///
/// The credential and base URL come from the request document, never
/// from ambient state, so concurrent invocations with different tenants
/// cannot leak into each other.
pub fn build_service(request: &SimulationRequest, config: &Config) -> AutonomousService {
    let base_url = request
        .base_api_url
        .clone()
        .unwrap_or_else(|| config.api.base_url.clone());
    let ctx = ApiContext::new(request.token.clone(), base_url);

    let conversation = Arc::new(AgentConversationClient::new(ctx.clone()));
    let resolver = Arc::new(PlatformDirectoryClient::new(ctx.clone()));
    let telephony = Arc::new(VoiceGatewayClient::new(ctx.clone()));

    let content_handler = |profile: ChannelProfile| {
        let tools = Arc::new(ChannelApiClient::new(ctx.clone(), profile.kind));
        ContentChannelHandler::new(
            profile,
            tools.clone(),
            tools.clone(),
            tools,
            conversation.clone(),
            config,
        )
    };

    let terminator = SessionTerminator::new(
        conversation.clone(),
        std::time::Duration::from_millis(config.timeouts.stop_ms),
    );
    let vishing = VishingHandler::new(
        conversation.clone(),
        telephony,
        terminator,
        std::time::Duration::from_millis(config.timeouts.generation_ms),
        std::time::Duration::from_millis(config.timeouts.call_ms),
    );

    AutonomousService::new(
        resolver,
        content_handler(PHISHING),
        content_handler(SMISHING),
        content_handler(TRAINING),
        vishing,
        config.clone(),
    )
}

pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { request, config } => {
            let config = load_config(config.as_deref())?;
            let request = read_request(&request)?;
            let service = build_service(&request, &config);
            let report = service.run(&request).await;

            let rendered = if cli.compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{rendered}");
            Ok(())
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
