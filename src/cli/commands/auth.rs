use clap::Subcommand;

use crate::auth::LoginOutcome;
use crate::cli::prompt::ask;
use crate::cli::shell::Session;
use crate::cli::utils::*;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Log in to the carshop server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, session: &mut Session) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => ask(&session.input, "Password: ").await.unwrap_or_default(),
            };

            match session.gate.login(&username, &password).await {
                LoginOutcome::Authenticated => {
                    output_success(&session.output_format, &format!("Logged in as '{}'", username), None)?;
                    session.mount_list().await;
                }
                LoginOutcome::AlreadyAuthenticated => {
                    output_error(&session.output_format, "Already logged in", Some("ALREADY_AUTHENTICATED"))?;
                }
                // The login-failed notification is rendered before the next prompt
                LoginOutcome::Failed(e) => output_client_error(&session.output_format, &e)?,
            }
            Ok(())
        }
    }
}
