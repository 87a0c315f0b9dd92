use clap::Subcommand;

use crate::cli::shell::{not_logged_in, Session};
use crate::cli::utils::*;
use crate::controller::MutationOutcome;
use crate::editor::EditorMode;
use crate::model::Field;

#[derive(Subcommand)]
pub enum EditorCommands {
    #[command(about = "Open the new-car form")]
    New,

    #[command(about = "Open the edit form for a car")]
    Edit {
        #[arg(help = "Row number or locator")]
        row: String,
    },

    #[command(about = "Set a field of the open form")]
    Set {
        #[arg(help = "brand, model, color, year, fuel or price")]
        field: Field,
        #[arg(help = "New value (words are joined, quote for empty)", num_args = 0.., allow_hyphen_values = true)]
        value: Vec<String>,
    },

    #[command(about = "Show the open form")]
    Show,

    #[command(about = "Save the open form and close it")]
    Save,

    #[command(about = "Close the open form, discarding changes")]
    Cancel,
}

pub async fn handle(cmd: EditorCommands, session: &mut Session) -> anyhow::Result<()> {
    session.list()?;

    match cmd {
        EditorCommands::New => {
            session.editor.open_create()?;
            show_draft(session)
        }
        EditorCommands::Edit { row } => {
            let car = session.find_car(&row)?;
            session.editor.open_edit(&car)?;
            show_draft(session)
        }
        EditorCommands::Set { field, value } => {
            session.editor.set(field, value.join(" "))?;
            Ok(())
        }
        EditorCommands::Show => show_draft(session),
        EditorCommands::Save => {
            let list = session.list.as_ref().ok_or_else(not_logged_in)?;
            match session.editor.save(list).await? {
                MutationOutcome::Applied { .. } => {
                    output_success(&session.output_format, "Saved", None)?;
                }
                // Alert already shown, or failure logged
                MutationOutcome::Rejected(e) | MutationOutcome::Failed(e) => {
                    output_client_error(&session.output_format, &e)?;
                }
                MutationOutcome::Declined => {}
            }
            Ok(())
        }
        EditorCommands::Cancel => {
            if !session.editor.cancel() {
                output_error(&session.output_format, "No editor is open", Some("NOT_OPEN"))?;
            }
            Ok(())
        }
    }
}

fn show_draft(session: &Session) -> anyhow::Result<()> {
    let title = match session.editor.mode() {
        Some(EditorMode::Create) => "New car",
        Some(EditorMode::Edit { .. }) => "Edit car",
        None => return Err(crate::editor::EditorError::NotOpen.into()),
    };
    match session.editor.draft() {
        Some(draft) => output_draft(&session.output_format, title, draft),
        None => Err(crate::editor::EditorError::NotOpen.into()),
    }
}
