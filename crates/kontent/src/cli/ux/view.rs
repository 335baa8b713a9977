//! Banner and conversation rendering.
use kontent_core::dispatch::SubmitError;
use kontent_core::session::{ConversationView, Identity, Session};

use super::presenter::{ChatMessageType, style_chat_text};

/// Formats the welcome banner shown before anything is submitted.
pub fn format_banner(identity: &Identity) -> String {
    let greeting = match identity.display_name.as_deref() {
        Some(name) if !name.trim().is_empty() => format!("Welcome, {name}!"),
        _ => "Welcome!".to_string(),
    };
    format!(
        "{}\n{}",
        style_chat_text(&greeting, ChatMessageType::Banner),
        style_chat_text(
            "Type your script data and select LONG or SHORT form.",
            ChatMessageType::Footer
        )
    )
}

/// Formats the most recent question and answer.
pub fn format_conversation(identity: &Identity, question: &str, answer: &str) -> String {
    let asker = identity.email.as_deref().unwrap_or("You");
    format!(
        "{} {}\n\n{}",
        style_chat_text(&format!("{asker}:"), ChatMessageType::Prompt),
        style_chat_text(question, ChatMessageType::Question),
        style_chat_text(answer, ChatMessageType::Answer)
    )
}

/// Formats a failed submission for display.
pub fn format_failure(error: &SubmitError) -> String {
    let detail = match error {
        SubmitError::Transport(_) => "could not reach the server",
        SubmitError::Status { status, .. } if *status == 401 || *status == 403 => {
            "not authorized, try `kontent login`"
        }
        SubmitError::Status { .. } => "the server returned an error",
        SubmitError::MalformedResponse(_) => "the server sent an unexpected response",
    };
    style_chat_text(
        &format!("Request failed ({detail}), try again."),
        ChatMessageType::Error,
    )
    .to_string()
}

/// Renders the session: the banner until a submission succeeds, then the
/// latest conversation. A pending failure is appended.
pub fn render_view(session: &Session) -> String {
    let mut out = match session.view() {
        ConversationView::NotStarted => format_banner(session.identity()),
        ConversationView::Started { question, answer } => {
            format_conversation(session.identity(), question, answer)
        }
    };
    if let Some(error) = session.last_error() {
        out.push_str("\n\n");
        out.push_str(&format_failure(error));
    }
    out
}
