//! Kontent app cli definition and entrypoint.
mod ask;
mod auth;
mod chat;
pub mod ux;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kontent_core::config::{Config, get_config};
use kontent_core::mode::Mode;
use kontent_core::session::Identity;

use crate::log::setup_logging;

/// Kontent - short and long form content generation.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show verbose logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat interactively: type prompts, pick a mode and read the answers.
    Chat {
        /// Email shown alongside your questions.
        #[arg(long)]
        email: Option<String>,
        /// Name used in the welcome banner.
        #[arg(long)]
        name: Option<String>,
    },
    /// Submit a single prompt and print the answer.
    Ask {
        /// Prompt to submit.
        prompt: Vec<String>,
        /// Generate Long Form content.
        #[arg(long, conflicts_with = "short")]
        long: bool,
        /// Generate Short Form content (default).
        #[arg(long)]
        short: bool,
    },
    /// Save the session token used for requests.
    /// If TOKEN is not provided, it is read from stdin.
    Login {
        /// Token to save.
        token: Option<String>,
    },
    /// Remove the saved session token.
    Logout,
}

/// Builds the session identity, flags override the configured values.
fn resolve_identity(config: &Config, email: Option<String>, name: Option<String>) -> Identity {
    Identity {
        email: email.or_else(|| config.user.email.clone()),
        display_name: name.or_else(|| config.user.display_name.clone()),
    }
}

/// Mode picked by the `ask` flags, Short Form unless `--long` is given.
fn ask_mode(long: bool) -> Mode {
    if long {
        Mode::LongForm
    } else {
        Mode::ShortForm
    }
}

/// Runs the main CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    let config = get_config(cli.config.clone()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Chat { email, name } => {
            chat::execute(resolve_identity(&config, email, name), &config).await
        }
        Commands::Ask { prompt, long, .. } => {
            ask::execute(prompt, ask_mode(long), &config).await
        }
        Commands::Login { token } => auth::login(token),
        Commands::Logout => auth::logout(),
    }
}
