use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use draftloop_application::WorkflowEngine;
use draftloop_core::config::ClientConfig;
use draftloop_core::notification::NotificationKind;
use draftloop_interaction::{load_client_config, HttpGenerationClient};

mod commands;
mod render;

use commands::{parse_command, Command, COMMAND_NAMES, HELP_TEXT};

#[derive(Parser)]
#[command(name = "draftloop")]
#[command(about = "Draftloop - generate, revise and approve drafts", long_about = None)]
struct Cli {
    /// Base URL of the generation service
    #[arg(long)]
    base_url: Option<String>,

    /// Lead id pre-filled for generate
    #[arg(long)]
    lead_id: Option<String>,

    /// User id pre-filled for generate
    #[arg(long)]
    user_id: Option<String>,

    /// Path to config.toml (defaults to ~/.config/draftloop/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = load_client_config(self.config.as_deref()).with_context(|| {
            match &self.config {
                Some(path) => format!("Failed to load {}", path.display()),
                None => "Failed to load configuration".to_string(),
            }
        })?;

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(lead_id) = &self.lead_id {
            config.default_lead_id = lead_id.clone();
        }
        if let Some(user_id) = &self.user_id {
            config.default_user_id = user_id.clone();
        }
        Ok(config)
    }
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMAND_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let name = line.split_whitespace().next().unwrap_or_default();
        if self.commands.iter().any(|cmd| cmd == name) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }

        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command against the engine. Returns false when the REPL should exit.
async fn dispatch(engine: &WorkflowEngine, command: Command) -> bool {
    match command {
        Command::Generate { instructions } => {
            if let Some(instructions) = instructions {
                engine.set_instructions(instructions).await;
            }
            println!("{}", "Generating...".bright_black());
            engine.generate().await;
        }
        Command::SetLead(lead_id) => engine.set_lead_id(lead_id).await,
        Command::SetUser(user_id) => engine.set_user_id(user_id).await,
        Command::SetInstructions(instructions) => engine.set_instructions(instructions).await,
        Command::Feedback(feedback) => {
            println!("{}", "Regenerating...".bright_black());
            let outcome = engine.regenerate_with_feedback(feedback).await;
            render::print_outcome("feedback", &outcome);
        }
        Command::ToggleEdit => {
            let outcome = engine.toggle_edit().await;
            render::print_outcome("edit", &outcome);
        }
        Command::Subject(subject) => {
            if !engine.set_edit_subject(subject).await {
                println!("{}", "Not editing. Type 'edit' first.".yellow());
            }
        }
        Command::Body(body) => {
            if !engine.set_edit_body(body).await {
                println!("{}", "Not editing. Type 'edit' first.".yellow());
            }
        }
        Command::Navigate(direction) => {
            let outcome = engine.navigate(direction).await;
            render::print_outcome("navigate", &outcome);
        }
        Command::Approve => {
            println!("{}", "Approving...".bright_black());
            let outcome = engine.approve().await;
            render::print_outcome("approve", &outcome);
        }
        Command::Show => {}
        Command::Context => {
            render::print_context(&engine.view().await);
            return true;
        }
        Command::Help => {
            println!("{}", HELP_TEXT.bright_black());
            return true;
        }
        Command::Quit => return false,
    }

    let view = engine.view().await;
    render::print_notification(&view.notification);
    render::print_view(&view);
    true
}

/// The main entry point for the Draftloop REPL.
///
/// Loads configuration, wires the HTTP client into a [`WorkflowEngine`] and
/// turns each input line into one workflow intent.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    tracing::info!(base_url = %config.base_url, "Starting draftloop");

    let client = HttpGenerationClient::from_config(&config)?;
    let engine = WorkflowEngine::from_config(Arc::new(client), &config);

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Draftloop ===".bright_magenta().bold());
    println!("{}", format!("Service: {}", config.base_url).bright_black());
    println!("{}", "Type 'help' for commands, or 'quit' to exit.".bright_black());
    println!();
    render::print_view(&engine.view().await);

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match parse_command(trimmed) {
                    Ok(command) => {
                        if !dispatch(&engine, command).await {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                    }
                    Err(message) => {
                        engine.notify(NotificationKind::Error, message.clone()).await;
                        println!("{}", message.red());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
