use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use voiceassist::logging::{self, LogTarget};
use voiceassist::{AppConfig, DisplayList, EngineError, QueryPipeline, SubmitError};

/// voiceassist - ask Wolfram|Alpha questions from the terminal
#[derive(Parser)]
#[command(name = "voiceassist")]
#[command(about = "Ask Wolfram|Alpha questions from the terminal")]
#[command(version)]
struct Cli {
    /// Wolfram|Alpha app id (overrides WOLFRAM_APP_ID)
    #[arg(long, global = true, value_name = "APP_ID")]
    app_id: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Launch interactive terminal UI
    Tui,
    /// Ask a single question and print the answer pods
    Ask(AskCommand),
}

/// Ask a single question
#[derive(Parser)]
struct AskCommand {
    /// The question; multiple words are joined with spaces
    #[arg(value_name = "QUESTION", required = true, num_args = 1..)]
    question: Vec<String>,
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match &cli.command {
        None | Some(Commands::Tui) => handle_tui(&cli),
        Some(Commands::Ask(cmd)) => handle_ask(&cli, cmd),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are problems with the question or the credentials the user
/// supplied. Everything else (network, terminal, I/O) is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<SubmitError>(),
            Some(SubmitError::EmptyQuestion | SubmitError::Unrecognized)
        ) || matches!(
            cause.downcast_ref::<EngineError>(),
            Some(EngineError::MissingAppId)
        ) || cause.downcast_ref::<voiceassist::ConfigError>().is_some()
    })
}

/// Resolves configuration from the environment and command-line overrides.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let config = AppConfig::from_env().context("Failed to read configuration")?;
    Ok(config.with_app_id(cli.app_id.clone()))
}

/// Handles the tui command by starting the interactive interface.
fn handle_tui(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    let log_path = voiceassist::utils::get_log_path()?;
    logging::init(LogTarget::File(log_path))?;

    voiceassist::tui::run(&config)
}

/// Handles the ask command by submitting one question and printing the entries.
fn handle_ask(cli: &Cli, cmd: &AskCommand) -> Result<()> {
    let question = cmd.question.join(" ");
    if question.trim().is_empty() {
        return Err(SubmitError::EmptyQuestion.into());
    }

    let config = load_config(cli)?;
    logging::init(LogTarget::Stderr)?;

    let client = config
        .build_client()
        .context("Failed to create Wolfram|Alpha client")?;
    let pipeline = QueryPipeline::new(Arc::new(client));

    let entries = pipeline.submit(&question)?;
    let mut list = DisplayList::new();
    list.prepend_all(entries);

    print!("{}", format_entries(&list));
    Ok(())
}

/// Formats entries as a title line followed by indented content lines.
fn format_entries(list: &DisplayList) -> String {
    if list.is_empty() {
        return "No results\n".to_string();
    }

    let mut out = String::new();
    for entry in list.iter() {
        out.push_str(entry.title());
        out.push('\n');
        for line in entry.content().lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
