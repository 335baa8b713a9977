use crate::cli::ux::{
    ChatMessageType, GenerationSpinner, format_failure, format_footer, render_view,
    style_chat_text,
};
use anyhow::{Context, Result};
use kontent_core::config::Config;
use kontent_core::credential::{Credential, TokenStore};
use kontent_core::dispatch::{Generator, HttpGenerator};
use kontent_core::session::{Identity, Session, SessionError};
use std::time::Instant;
use tracing::debug;

mod commands;
mod compl;
mod repl;
#[cfg(test)]
mod test_utils;

/// State shared by the REPL and its commands.
pub struct ChatContext<'a> {
    pub session: Session,
    generator: &'a dyn Generator,
    credential: Credential,
}

impl<'a> ChatContext<'a> {
    pub fn new(session: Session, generator: &'a dyn Generator, credential: Credential) -> Self {
        Self {
            session,
            generator,
            credential,
        }
    }

    /// Submits the draft and prints the outcome.
    ///
    /// Ctrl-C while waiting abandons the request and leaves the session as it was.
    pub async fn submit_draft(&mut self) -> Result<()> {
        let request = match self.session.begin_submit() {
            Ok(request) => request,
            Err(e) => {
                eprintln!("{}", style_chat_text(&e.to_string(), ChatMessageType::Error));
                return Ok(());
            }
        };

        let mode = request.mode;
        let spinner = GenerationSpinner::new(format!("Generating {mode}..."));
        let start = Instant::now();
        let result = tokio::select! {
            _ = tokio::signal::ctrl_c() => None,
            result = self.generator.generate(&request, &self.credential) => Some(result),
        };
        spinner.clear();

        let Some(result) = result else {
            self.session.abandon_submit();
            println!("{}", style_chat_text("◼ Cancelled.", ChatMessageType::Footer));
            return Ok(());
        };

        match self.session.complete_submit(request, result) {
            Ok(()) => {
                println!("\n{}", render_view(&self.session));
                println!();
                eprintln!("{}", format_footer(mode, start.elapsed().as_millis()));
            }
            Err(SessionError::Submit(e)) => {
                debug!("Submission failed: {e}");
                eprintln!("{}", format_failure(&e));
                eprintln!("{}", style_chat_text(&e.to_string(), ChatMessageType::Footer));
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

/// Executes the chat command, starting an interactive REPL session.
pub async fn execute(identity: Identity, config: &Config) -> Result<()> {
    let store = TokenStore::open_default().context("Failed to open token store")?;
    let credential = config
        .resolve_credential(&store)
        .context("Failed to read credential")?;
    let generator =
        HttpGenerator::new(&config.endpoint).context("Failed to initialize HTTP client")?;

    let mut ctx = ChatContext::new(Session::new(identity), &generator, credential);
    repl::run(&mut ctx).await
}
