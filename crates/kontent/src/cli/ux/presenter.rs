use console::{Style, StyledObject};
use kontent_core::mode::Mode;

/// Represents the type of a chat message, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMessageType {
    /// The prompt for user input.
    Prompt,
    /// Metadata shown in the prompt, like the selected mode.
    PromptMeta,
    /// The welcome banner.
    Banner,
    /// The submitted question.
    Question,
    /// The generated answer.
    Answer,
    /// Footer information, like metrics or status.
    Footer,
    /// An error message.
    Error,
}

/// Styles a string of text according to the specified `ChatMessageType`.
pub fn style_chat_text(text: &str, style: ChatMessageType) -> StyledObject<&str> {
    let style_obj = match style {
        ChatMessageType::Prompt => Style::new().blue().bold(),
        ChatMessageType::PromptMeta => Style::new().blue().dim(),
        ChatMessageType::Banner => Style::new().magenta().bold(),
        ChatMessageType::Question => Style::new().blue(),
        ChatMessageType::Answer => Style::new(),
        ChatMessageType::Footer => Style::new().white().dim(),
        ChatMessageType::Error => Style::new().red().bold(),
    };
    style_obj.apply_to(text)
}

/// Formats the input prompt, showing the currently selected mode.
pub fn format_status_prompt(mode: Option<Mode>) -> String {
    let meta = match mode {
        Some(mode) => format!(
            "{}{}",
            style_chat_text("mode ", ChatMessageType::PromptMeta),
            style_chat_text(mode.label(), ChatMessageType::Prompt)
        ),
        None => style_chat_text(
            "no mode selected, use /short or /long",
            ChatMessageType::PromptMeta,
        )
        .to_string(),
    };
    format!(
        "\n{}\n{}",
        meta,
        style_chat_text("> ", ChatMessageType::Prompt)
    )
}

/// Formats the footer shown after a response.
pub fn format_footer(mode: Mode, elapsed_ms: u128) -> String {
    let footer = format!(
        "◼ Completed ({}). {:.2}s total",
        mode.label(),
        elapsed_ms as f64 / 1000.0
    );
    style_chat_text(&footer, ChatMessageType::Footer).to_string()
}
