//! simplifier - rewrite a paragraph into plain language.
//!
//! Takes a paragraph in a small terminal form (or on stdin), asks a hosted
//! text-generation provider to simplify it, and shows the simplified text.

mod client;
mod config;
mod error;
mod locale;
mod prompt;
mod provider;
mod simplifier;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use locale::Language;
use simplifier::Simplifier;
use std::process::Command as ProcessCommand;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simplifier")]
#[command(author, version, about = "Rewrite a paragraph into plain language")]
#[command(long_about = "Opens a small form: type or paste a paragraph, press Enter, \
and read the simplified version.\n\nWith --pipe (or when stdin is not a terminal) the \
paragraph is read from the argument or stdin and the result is printed to stdout.")]
struct Cli {
    /// Paragraph to simplify (pre-fills the form)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// No form, just print the simplified text (for scripting)
    #[arg(long)]
    pipe: bool,

    /// Override the configured language
    #[arg(short = 'l', long, value_enum, value_name = "LANG")]
    language: Option<Language>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open configuration file in $EDITOR
    Config,
    /// Show the configured provider and check that it is usable
    Check,
}

/// Where diagnostics go.
enum LogTarget {
    Stderr,
    File,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config) => {
            init_logging(LogTarget::Stderr)?;
            handle_config()
        }
        Some(Commands::Check) => {
            init_logging(LogTarget::Stderr)?;
            handle_check(cli.language).await
        }
        None => {
            let pipe_mode = cli.pipe || !atty::is(atty::Stream::Stdin);
            if pipe_mode {
                init_logging(LogTarget::Stderr)?;
                let code = handle_pipe(cli.text, cli.language).await?;
                if code != 0 {
                    std::process::exit(code);
                }
                Ok(())
            } else {
                init_logging(LogTarget::File)?;
                handle_form(cli.text, cli.language).await
            }
        }
    }
}

/// Initialize tracing.
///
/// The form owns the terminal, so in that mode the log goes to a file.
fn init_logging(target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("simplifier=info,reqwest=warn"));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogTarget::File => {
            let log_path = config::Config::log_path()?;
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    }
    Ok(())
}

/// Load config, apply the language override, and build the simplifier.
fn build_simplifier(language: Option<Language>) -> Result<(config::Config, Simplifier)> {
    let mut config = config::Config::load().context("Failed to load configuration")?;
    if let Some(language) = language {
        config.language = language;
    }

    let backend = provider::create_backend(&config)?;
    info!(
        "Using provider: {} (model: {})",
        config.provider_type(),
        config.model_name()
    );
    let simplifier = Simplifier::new(Arc::new(backend), config.language);
    Ok((config, simplifier))
}

/// Run the interactive form.
async fn handle_form(text: Option<String>, language: Option<Language>) -> Result<()> {
    let (_, simplifier) = build_simplifier(language)?;
    info!("Opening form");
    client::run_tui(simplifier, text).await
}

/// Simplify one paragraph from the argument or stdin and print the result.
///
/// Returns the process exit status.
async fn handle_pipe(text: Option<String>, language: Option<Language>) -> Result<i32> {
    let (config, simplifier) = build_simplifier(language)?;

    let raw = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read paragraph from stdin")?;
            buf
        }
    };

    let outcome = client::run_once(simplifier, &raw).await?;
    outcome
        .report(
            config.language.strings(),
            &mut std::io::stdout().lock(),
            &mut std::io::stderr().lock(),
        )
        .context("Failed to print the outcome")?;
    Ok(outcome.exit_code())
}

/// Show the provider and run its health check.
async fn handle_check(language: Option<Language>) -> Result<()> {
    let mut config = config::Config::load().context("Failed to load configuration")?;
    if let Some(language) = language {
        config.language = language;
    }
    let backend = provider::create_backend(&config)?;

    println!("Provider: {}", config.provider_type());
    println!("Model: {}", config.model_name());
    println!("Language: {:?}", config.language);
    match config.request_timeout() {
        Some(timeout) => println!("Request timeout: {}s", timeout.as_secs()),
        None => println!("Request timeout: none"),
    }
    println!("Config: {}", config::Config::config_path()?.display());

    backend.health_check().await.with_context(|| {
        format!(
            "Provider check failed for {} ({})",
            config.provider_type(),
            config.model_name()
        )
    })?;
    println!("Status: ready");
    Ok(())
}

/// Handle the config command.
fn handle_config() -> Result<()> {
    let config_path = config::Config::config_path()?;

    // Create default config if it doesn't exist
    if !config_path.exists() {
        config::Config::default().save()?;
        println!("Created default config at {}", config_path.display());
    }

    // Open in editor
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = ProcessCommand::new(&editor)
        .arg(&config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        eprintln!("Editor exited with non-zero status");
    }

    Ok(())
}
