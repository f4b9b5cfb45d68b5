/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Switch UI mode (directive).
    ModeChanged(String),
    /// Capture one voice utterance and run it as an exchange.
    Voice,
    /// Analyze a source file (one-shot, not part of the session).
    Analyze(String),
    /// Show status (mode, model, memory file).
    ShowStatus,
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,

        "/mode" => {
            if arg.is_empty() {
                CommandResult::Message(
                    "Available modes: copilot, chat\nUsage: /mode <name>".into(),
                )
            } else {
                CommandResult::ModeChanged(arg.to_string())
            }
        }
        "/voice" => CommandResult::Voice,
        "/analyze" => {
            if arg.is_empty() {
                CommandResult::Message(
                    "Usage: /analyze <file>\nExample: /analyze src/main.py".into(),
                )
            } else {
                CommandResult::Analyze(arg.to_string())
            }
        }
        "/status" => CommandResult::ShowStatus,
        "/version" => CommandResult::Message(format!("Clawdbot v{}", env!("CARGO_PKG_VERSION"))),

        // Unknown command
        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ Clawdbot Commands ────────────────────────────────────────────╮

  CHAT
    <text>                    Send a message to the model
    search: <query>           Web search instead of the model

  MODES & INPUT
    /mode <name>              Switch mode (copilot, chat)
    /voice                    Speak one message instead of typing
    /analyze <file>           Analyze a source file (not saved to memory)

  OTHER
    /status                   Show mode, model, and memory file
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit the application

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
