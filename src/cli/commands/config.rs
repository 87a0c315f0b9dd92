use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::ClientConfig;

pub fn handle(config: &ClientConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "config": config }))?);
        }
        OutputFormat::Text => {
            println!("Environment:          {:?}", config.environment);
            println!("Server:               {}", config.server.base_url);
            println!("Login failed toast:   {} ms", config.notifications.login_failed_ms);
            println!("Car deleted toast:    {} ms", config.notifications.car_deleted_ms);
            println!("Default log filter:   {}", config.logging.default_filter);
        }
    }
    Ok(())
}
