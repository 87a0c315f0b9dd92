use clap::Parser;
use carshop_client::cli::Cli;
use carshop_client::config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so CARSHOP_SERVER_URL etc. can live next to the binary
    let _ = dotenvy::dotenv();

    let config = config::config().clone();

    // Logs go to stderr, tables to stdout
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Config loaded before the subscriber existed
    for ignored in &config.ignored_overrides {
        tracing::warn!("{}", ignored);
    }

    tracing::debug!("Starting carshop client in {:?} mode", config.environment);

    let cli = Cli::parse();

    if let Err(e) = carshop_client::cli::run(cli, config).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
