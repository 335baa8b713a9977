use crate::cli::chat::ChatContext;
use crate::cli::chat::commands::{CliCommand, parse_command_line};
use crate::cli::chat::compl::Repl;
use crate::cli::ux::{format_status_prompt, render_view};
use anyhow::Result;
use clap::{CommandFactory, Parser};
use rustyline::error::ReadlineError;
use rustyline::{CompletionType, Editor};

/// What a line of input asks the REPL to do.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Command(&'a str),
    Prompt(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let trimmed_line = line.trim();
    if trimmed_line.is_empty() {
        Input::Empty
    } else if trimmed_line.starts_with('/') {
        Input::Command(trimmed_line)
    } else {
        Input::Prompt(line)
    }
}

/// Handles one line of input. Returns `Ok(false)` if the REPL should exit.
async fn handle_line(ctx: &mut ChatContext<'_>, line: &str) -> Result<bool> {
    match classify(line) {
        // An empty prompt is still a prompt once a mode is picked.
        Input::Empty if ctx.session.mode().is_some() => {
            ctx.session.set_draft("");
            ctx.submit_draft().await?;
            Ok(true)
        }
        Input::Empty => Ok(true),
        Input::Command(command) => match CliCommand::try_parse_from(parse_command_line(command)) {
            Ok(cli_command) => cli_command.command.execute(ctx).await,
            Err(e) => {
                e.print()?;
                Ok(true)
            }
        },
        // A typed line is the draft, the Enter that ended it submits.
        Input::Prompt(text) => {
            ctx.session.set_draft(text);
            ctx.submit_draft().await?;
            Ok(true)
        }
    }
}

/// Runs the interactive REPL for the chat session.
pub async fn run(ctx: &mut ChatContext<'_>) -> Result<()> {
    println!("{}", render_view(&ctx.session));
    println!("Select a mode with /short or /long, then type your prompt. '/help' lists commands, '/q' exits.");

    let config = rustyline::Config::builder()
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let command_names = CliCommand::command()
        .get_subcommands()
        .flat_map(|c| c.get_name_and_visible_aliases())
        .map(|s| format!("/{s}"))
        .collect::<Vec<_>>();

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(Repl { command_names }));

    loop {
        let prompt = format_status_prompt(ctx.session.mode());
        match rl.readline(&prompt) {
            Ok(line) => {
                rl.add_history_entry(&line)?;
                if !handle_line(ctx, &line).await? {
                    return Ok(());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Type /quit to exit.");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nBye!");
                return Ok(());
            }
            Err(err) => {
                return Err(err.into());
            }
        }
    }
}
