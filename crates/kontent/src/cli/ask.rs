use anyhow::{Context, Result, anyhow};
use kontent_core::config::Config;
use kontent_core::credential::{Credential, TokenStore};
use kontent_core::dispatch::{Generator, HttpGenerator};
use kontent_core::mode::Mode;
use kontent_core::session::{ConversationView, Session};
use std::time::Instant;

use crate::cli::ux::{GenerationSpinner, format_footer};

/// Submits `prompt` once and returns the answer.
async fn ask(
    prompt: String,
    mode: Mode,
    generator: &dyn Generator,
    credential: &Credential,
) -> Result<String> {
    let mut session = Session::default();
    session.set_draft(prompt);
    session.select_mode(mode);
    session
        .submit(generator, credential)
        .await
        .context("Failed to generate content")?;

    match session.view() {
        ConversationView::Started { answer, .. } => Ok(answer.clone()),
        ConversationView::NotStarted => Err(anyhow!("No answer received")),
    }
}

/// Executes the ask command with the given prompt and mode.
pub async fn execute(prompt: Vec<String>, mode: Mode, config: &Config) -> Result<()> {
    let store = TokenStore::open_default().context("Failed to open token store")?;
    let credential = config
        .resolve_credential(&store)
        .context("Failed to read credential")?;
    let generator =
        HttpGenerator::new(&config.endpoint).context("Failed to initialize HTTP client")?;

    let spinner = GenerationSpinner::new(format!("Generating {mode}..."));
    let start = Instant::now();
    let result = ask(prompt.join(" "), mode, &generator, &credential).await;
    spinner.clear();

    println!("{}", result?);
    eprintln!();
    eprintln!("{}", format_footer(mode, start.elapsed().as_millis()));
    Ok(())
}
