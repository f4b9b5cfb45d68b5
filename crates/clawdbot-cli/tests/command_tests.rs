use clawdbot_cli::commands::{handle_command, CommandResult};

// ========================================================================
// Command Parsing Tests (commands.rs)
// ========================================================================

#[test]
fn test_help_command() {
    let result = handle_command("/help");

    if let CommandResult::Message(msg) = result {
        assert!(msg.contains("Clawdbot Commands"));
        assert!(msg.contains("/voice"));
        assert!(msg.contains("search:"));
    } else {
        panic!("expected Message");
    }
}

#[test]
fn test_help_command_short_alias() {
    assert!(matches!(handle_command("/h"), CommandResult::Message(_)));
}

#[test]
fn test_quit_commands() {
    assert!(matches!(handle_command("/exit"), CommandResult::Quit));
    assert!(matches!(handle_command("/quit"), CommandResult::Quit));
    assert!(matches!(handle_command("/q"), CommandResult::Quit));
}

#[test]
fn test_mode_command_with_argument() {
    assert_eq!(
        handle_command("/mode chat"),
        CommandResult::ModeChanged("chat".to_string())
    );
}

#[test]
fn test_mode_command_without_argument_shows_usage() {
    if let CommandResult::Message(msg) = handle_command("/mode") {
        assert!(msg.contains("copilot"));
        assert!(msg.contains("chat"));
    } else {
        panic!("expected Message");
    }
}

#[test]
fn test_voice_command() {
    assert_eq!(handle_command("/voice"), CommandResult::Voice);
}

#[test]
fn test_analyze_command_with_path() {
    assert_eq!(
        handle_command("/analyze src/main.py"),
        CommandResult::Analyze("src/main.py".to_string())
    );
}

#[test]
fn test_analyze_command_without_path_shows_usage() {
    assert!(matches!(
        handle_command("/analyze"),
        CommandResult::Message(_)
    ));
}

#[test]
fn test_status_command() {
    assert_eq!(handle_command("/status"), CommandResult::ShowStatus);
}

#[test]
fn test_unknown_slash_command() {
    if let CommandResult::Message(msg) = handle_command("/bogus") {
        assert!(msg.contains("Unknown command"));
    } else {
        panic!("expected Message");
    }
}

#[test]
fn test_plain_text_is_not_a_command() {
    assert_eq!(handle_command("hello there"), CommandResult::NotACommand);
}

#[test]
fn test_search_prefixed_text_is_not_a_command() {
    // search: inputs flow through the normal exchange path; classification
    // happens in the session controller, not here.
    assert_eq!(
        handle_command("search: rust ownership"),
        CommandResult::NotACommand
    );
}
