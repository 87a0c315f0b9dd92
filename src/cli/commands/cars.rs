use clap::Subcommand;

use crate::cli::shell::Session;
use crate::cli::utils::*;
use crate::controller::{MutationOutcome, SyncOutcome};

#[derive(Subcommand)]
pub enum CarCommands {
    #[command(about = "Show the car list")]
    List,

    #[command(about = "Fetch the car list from the server again")]
    Refresh,

    #[command(about = "Delete a car (asks for confirmation)")]
    Delete {
        #[arg(help = "Row number or locator")]
        row: String,
    },
}

pub async fn handle(cmd: CarCommands, session: &mut Session) -> anyhow::Result<()> {
    let list = session.list()?;

    match cmd {
        CarCommands::List => {
            session.render_list(true)?;
            Ok(())
        }
        CarCommands::Refresh => {
            // Failures are logged by the controller and nothing changes
            if let SyncOutcome::Failed(e) = list.fetch_all().await {
                output_client_error(&session.output_format, &e)?;
            }
            Ok(())
        }
        CarCommands::Delete { row } => {
            session.ensure_editor_closed()?;
            let locator = session.find_car(&row)?.locator();

            match list.delete(&locator).await {
                MutationOutcome::Applied { .. } => {
                    if session.output_format == crate::cli::OutputFormat::Json {
                        output_success(
                            &session.output_format,
                            "Car deleted",
                            Some(serde_json::json!({ "locator": locator })),
                        )?;
                    }
                }
                MutationOutcome::Rejected(e) | MutationOutcome::Failed(e) => {
                    output_client_error(&session.output_format, &e)?;
                }
                MutationOutcome::Declined => {}
            }
            Ok(())
        }
    }
}
