use serde::{Deserialize, Serialize};

/// Generation style requested from the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Mode {
    #[serde(rename = "Short Form")]
    ShortForm,
    #[serde(rename = "Long Form")]
    LongForm,
}

impl Mode {
    /// Label sent as the `type` field of a submission.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::ShortForm => "Short Form",
            Mode::LongForm => "Long Form",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
