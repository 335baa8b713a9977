//! Saving and removing the session token.
use anyhow::{Context, Result, anyhow};
use kontent_core::credential::{TOKEN_KEY, TokenStore};
use std::io::BufRead;

use crate::cli::ux::{ChatMessageType, style_chat_text};

fn save_token(store: &TokenStore, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(anyhow!("Token must not be empty"));
    }
    store
        .set(TOKEN_KEY, token)
        .context("Failed to save token")?;
    Ok(())
}

/// Saves `token`, reading it from stdin when not given.
pub fn login(token: Option<String>) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => {
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read token from stdin")?;
            line
        }
    };

    let store = TokenStore::open_default().context("Failed to open token store")?;
    save_token(&store, &token)?;
    println!(
        "{}",
        style_chat_text("Token saved.", ChatMessageType::Footer)
    );
    Ok(())
}

/// Removes the saved token.
pub fn logout() -> Result<()> {
    let store = TokenStore::open_default().context("Failed to open token store")?;
    let message = if store.remove(TOKEN_KEY).context("Failed to remove token")? {
        "Token removed."
    } else {
        "No token was saved."
    };
    println!("{}", style_chat_text(message, ChatMessageType::Footer));
    Ok(())
}
