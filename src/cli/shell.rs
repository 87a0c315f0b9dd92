use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tokio::sync::watch;

use crate::api::{CarApi, HttpCarApi};
use crate::auth::AuthGate;
use crate::cli::commands::{auth::AuthCommands, cars::CarCommands, editor::EditorCommands};
use crate::cli::prompt::{ask, stdin_lines, InputLines, TerminalPrompter};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::ClientConfig;
use crate::controller::CarListController;
use crate::editor::RecordEditor;
use crate::model::{Car, CarCollection, Locator};
use crate::notify::{NoticeKind, Notifications};
use crate::prompt::Prompter;
use crate::session::CredentialStore;

/// One line typed at the shell prompt
#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand)]
pub enum ShellCommand {
    #[command(flatten)]
    Auth(AuthCommands),

    #[command(flatten)]
    Cars(CarCommands),

    #[command(flatten)]
    Editor(EditorCommands),

    #[command(about = "Close notifications")]
    Dismiss {
        #[arg(value_enum, help = "Which notification (all if omitted)")]
        kind: Option<NoticeArg>,
    },

    #[command(about = "End the session", visible_alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NoticeArg {
    Login,
    Deleted,
}

impl From<NoticeArg> for NoticeKind {
    fn from(arg: NoticeArg) -> Self {
        match arg {
            NoticeArg::Login => NoticeKind::LoginFailed,
            NoticeArg::Deleted => NoticeKind::CarDeleted,
        }
    }
}

#[derive(Debug)]
enum Flow {
    Continue,
    Quit,
}

pub fn not_logged_in() -> anyhow::Error {
    anyhow::anyhow!("Log in first: login <username>")
}

/// Everything that lives for one terminal session. Dropping it drops the
/// credential.
pub struct Session {
    pub gate: AuthGate,
    pub list: Option<CarListController>,
    pub view: Option<watch::Receiver<CarCollection>>,
    pub editor: RecordEditor,
    pub prompter: Arc<dyn Prompter>,
    pub input: InputLines,
    pub output_format: OutputFormat,
}

impl Session {
    pub fn new(
        api: Arc<dyn CarApi>,
        config: &ClientConfig,
        input: InputLines,
        prompter: Arc<dyn Prompter>,
        output_format: OutputFormat,
    ) -> Self {
        let notifications = Notifications::new(config.notifications.clone());
        Self {
            gate: AuthGate::new(api, CredentialStore::new(), notifications),
            list: None,
            view: None,
            editor: RecordEditor::new(),
            prompter,
            input,
            output_format,
        }
    }

    pub fn list(&self) -> anyhow::Result<&CarListController> {
        self.list.as_ref().ok_or_else(not_logged_in)
    }

    /// Swap the login form for the car list and load it
    pub async fn mount_list(&mut self) {
        let Some(list) = self.gate.mount(self.prompter.clone()) else {
            return;
        };
        self.view = Some(list.subscribe());
        list.fetch_all().await;
        self.list = Some(list);
    }

    /// Print the list if it changed since last shown, or always with `force`
    pub fn render_list(&mut self, force: bool) -> anyhow::Result<()> {
        let Some(view) = self.view.as_mut() else {
            return Ok(());
        };
        if !force && !view.has_changed().unwrap_or(false) {
            return Ok(());
        }
        let collection = view.borrow_and_update().clone();
        output_cars(&self.output_format, &collection)
    }

    pub fn ensure_editor_closed(&self) -> anyhow::Result<()> {
        if self.editor.is_open() {
            anyhow::bail!("Close the open form first (save or cancel)");
        }
        Ok(())
    }

    /// Look a car up by 1-based row or by locator in the current list
    pub fn find_car(&self, row: &str) -> anyhow::Result<Car> {
        let collection = self.list()?.snapshot();
        let car = match row.parse::<usize>() {
            Ok(position) => collection.row(position),
            Err(_) => collection.find(&Locator::from(row)),
        };
        car.cloned()
            .ok_or_else(|| anyhow::anyhow!("No car at '{}'", row))
    }

    fn prompt(&self) -> &'static str {
        if !self.gate.is_authenticated() {
            "login> "
        } else if self.editor.is_open() {
            "form> "
        } else {
            "cars> "
        }
    }

    async fn dispatch(&mut self, command: ShellCommand) -> anyhow::Result<Flow> {
        match command {
            ShellCommand::Auth(cmd) => super::commands::auth::handle(cmd, self).await?,
            ShellCommand::Cars(cmd) => super::commands::cars::handle(cmd, self).await?,
            ShellCommand::Editor(cmd) => super::commands::editor::handle(cmd, self).await?,
            ShellCommand::Dismiss { kind } => {
                let notifications = self.gate.notifications();
                match kind {
                    Some(kind) => {
                        notifications.dismiss(kind.into());
                    }
                    None => notifications.dismiss_all(),
                }
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

pub async fn run(config: ClientConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let api: Arc<dyn CarApi> = Arc::new(HttpCarApi::new(config.server.base_url.clone()));
    let input = stdin_lines();
    let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter::new(input.clone()));
    let mut session = Session::new(api, &config, input.clone(), prompter, output_format);

    if output_format == OutputFormat::Text {
        println!("Carshop - {} (type 'help' for commands)", config.server.base_url);
    }

    loop {
        session.render_list(false)?;
        output_toasts(&output_format, &session.gate.notifications().visible())?;

        let Some(line) = ask(&input, session.prompt()).await else {
            break;
        };

        let words = match split_words(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                output_error(&output_format, &e, Some("PARSE_ERROR"))?;
                continue;
            }
        };

        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Also covers `help`
                e.print()?;
                continue;
            }
        };

        match session.dispatch(command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => output_error(&output_format, &e.to_string(), None)?,
        }
    }

    tracing::debug!("Session ended");
    Ok(())
}
