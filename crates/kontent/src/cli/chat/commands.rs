use crate::cli::chat::ChatContext;
use crate::cli::ux::{ChatMessageType, render_view, style_chat_text};
use anyhow::Result;
use clap::{Parser, Subcommand};
use kontent_core::mode::Mode;

// -------------
// REPL commands
// -------------
#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct CliCommand {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Hash, PartialEq, Eq)]
pub enum Command {
    /// Select Short Form output.
    ///
    /// With a prompt, also submits it.
    #[command(alias = "s")]
    Short {
        /// Prompt to submit right away
        prompt: Vec<String>,
    },
    /// Select Long Form output.
    ///
    /// With a prompt, also submits it.
    #[command(alias = "l")]
    Long {
        /// Prompt to submit right away
        prompt: Vec<String>,
    },
    /// Show the selected mode
    Mode,
    /// Show the current draft
    Draft,
    /// Submit the current draft with the selected mode
    #[command(alias = "send")]
    Submit,
    /// Start over with a new chat
    #[command(alias = "n", alias = "reset", alias = "clear")]
    New,
    /// Exit the chat session
    #[command(alias = "q", alias = "quit")]
    Exit,
}

impl Command {
    /// Executes a REPL command.
    ///
    /// Returns `Ok(false)` if the REPL should exit.
    pub async fn execute(self, ctx: &mut ChatContext<'_>) -> Result<bool> {
        match self {
            Command::Short { prompt } => Self::execute_select(ctx, Mode::ShortForm, prompt).await,
            Command::Long { prompt } => Self::execute_select(ctx, Mode::LongForm, prompt).await,
            Command::Mode => {
                match ctx.session.mode() {
                    Some(mode) => println!("Current mode: {mode}"),
                    None => println!("No mode selected. Use /short or /long."),
                }
                Ok(true)
            }
            Command::Draft => {
                if ctx.session.draft().is_empty() {
                    println!("Draft is empty.");
                } else {
                    println!("Draft: {}", ctx.session.draft());
                }
                Ok(true)
            }
            Command::Submit => {
                ctx.submit_draft().await?;
                Ok(true)
            }
            Command::New => {
                ctx.session.reset();
                println!("{}", render_view(&ctx.session));
                Ok(true)
            }
            Command::Exit => Ok(false),
        }
    }

    async fn execute_select(
        ctx: &mut ChatContext<'_>,
        mode: Mode,
        prompt: Vec<String>,
    ) -> Result<bool> {
        ctx.session.select_mode(mode);
        if prompt.is_empty() {
            println!(
                "{}",
                style_chat_text(&format!("{mode} selected"), ChatMessageType::Footer)
            );
        } else {
            ctx.session.set_draft(prompt.join(" "));
            ctx.submit_draft().await?;
        }
        Ok(true)
    }
}

/// Splits a command line into arguments, honoring shell quoting.
///
/// Falls back to whitespace splitting for unbalanced quotes.
pub fn parse_command_line(line: &str) -> Vec<String> {
    let trimmed_line = line.trim();
    shlex::split(trimmed_line).unwrap_or_else(|| {
        trimmed_line
            .split_whitespace()
            .map(str::to_string)
            .collect()
    })
}
