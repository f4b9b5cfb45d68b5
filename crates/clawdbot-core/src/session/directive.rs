use std::str::FromStr;

use crate::constants::directives;

/// The fixed system-level instruction selected by UI mode. Not persisted —
/// recomputed each run from the selected mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directive {
    #[default]
    CodingCopilot,
    ChatAssistant,
}

impl Directive {
    pub fn text(&self) -> &'static str {
        match self {
            Directive::CodingCopilot => directives::CODING_COPILOT,
            Directive::ChatAssistant => directives::CHAT_ASSISTANT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Directive::CodingCopilot => "Coding Copilot",
            Directive::ChatAssistant => "Chat Assistant",
        }
    }

    pub fn all() -> &'static [Directive] {
        &[Directive::CodingCopilot, Directive::ChatAssistant]
    }
}

impl FromStr for Directive {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "copilot" | "coding" | "coding-copilot" => Ok(Directive::CodingCopilot),
            "chat" | "assistant" | "chat-assistant" => Ok(Directive::ChatAssistant),
            other => Err(format!("Unknown mode: {other}. Options: copilot, chat")),
        }
    }
}
