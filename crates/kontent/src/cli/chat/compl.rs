use crate::cli::ux::{ChatMessageType, style_chat_text};
use rustyline::completion::{Candidate, Completer};
use rustyline::error::ReadlineError;
use rustyline::hint::Hinter;
use rustyline::{Helper, Highlighter, Validator};

/// Completion candidate for the REPL.
#[derive(Debug)]
pub struct CompletionCandidate {
    text: String,
    display_string: String,
}

impl CompletionCandidate {
    pub fn new(text: &str) -> Self {
        let display_string = style_chat_text(text, ChatMessageType::Footer).to_string();
        Self {
            text: text.to_owned(),
            display_string,
        }
    }
}

impl Candidate for CompletionCandidate {
    fn display(&self) -> &str {
        &self.display_string
    }

    fn replacement(&self) -> &str {
        &self.text
    }
}

/// REPL runtime state for command line editing.
#[derive(Helper, Validator, Highlighter)]
pub struct Repl {
    pub command_names: Vec<String>,
}

impl Completer for Repl {
    type Candidate = CompletionCandidate;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> Result<(usize, Vec<Self::Candidate>), ReadlineError> {
        // Only the command name itself is completed.
        if !line.starts_with('/') || line[..pos].contains(' ') {
            return Ok((0, Vec::new()));
        }

        let prefix = &line[..pos];
        let candidates = self
            .command_names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| CompletionCandidate::new(name))
            .collect();

        Ok((0, candidates))
    }
}

impl Hinter for Repl {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if line.is_empty() || pos < line.len() || !line.starts_with('/') {
            return None;
        }
        self.command_names
            .iter()
            .find(|&cmd_name| cmd_name.starts_with(line))
            .map(|cmd_name| cmd_name[line.len()..].into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::DefaultHistory;

    fn repl() -> Repl {
        Repl {
            command_names: vec![
                "/short".to_string(),
                "/submit".to_string(),
                "/long".to_string(),
            ],
        }
    }

    #[test]
    fn test_repl_completer_for_commands() {
        let history = DefaultHistory::new();
        let line = "/s";
        let (start, candidates) = repl()
            .complete(line, line.len(), &rustyline::Context::new(&history))
            .unwrap();
        assert_eq!(start, 0);
        let names: Vec<_> = candidates.iter().map(|c| c.replacement()).collect();
        assert_eq!(names, vec!["/short", "/submit"]);
    }

    #[test]
    fn test_repl_completer_ignores_prompts_and_arguments() {
        let history = DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);
        let (_, candidates) = repl().complete("hello", 5, &ctx).unwrap();
        assert!(candidates.is_empty());

        let line = "/short /s";
        let (_, candidates) = repl().complete(line, line.len(), &ctx).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_repl_hinter() {
        let history = DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);

        let line = "/lo";
        let hint = repl().hint(line, line.len(), &ctx).unwrap();
        assert_eq!(hint, "ng");

        assert!(repl().hint("abc", 3, &ctx).is_none());
        assert!(repl().hint("/long", 3, &ctx).is_none());
        assert!(repl().hint("", 0, &ctx).is_none());
    }
}
