pub mod commands;
pub mod prompt;
pub mod shell;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;

#[derive(Parser)]
#[command(name = "carshop")]
#[command(about = "Carshop CLI - browse and edit the car inventory of a carshop server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Server base URL (overrides CARSHOP_SERVER_URL)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start an interactive session (default)")]
    Shell,

    #[command(about = "Show the effective client configuration")]
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let config = match &cli.server {
        Some(url) => config
            .with_server_url(url)
            .map_err(|e| anyhow::anyhow!("Invalid --server '{}': {}", url, e))?,
        None => config,
    };

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell::run(config, output_format).await,
        Commands::Config => commands::config::handle(&config, output_format),
    }
}
