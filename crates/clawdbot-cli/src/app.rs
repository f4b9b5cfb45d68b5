use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clawdbot_core::config::{Settings, VoiceSettings};
use clawdbot_core::session::{analyze_source, Directive, MemoryStore, SessionController};
use clawdbot_core::voice::{listen, speak, Transcription};
use clawdbot_core::{constants::replies, OllamaGateway, Role, WebSearch};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use tokio::sync::mpsc;

// ── One-shot analyze mode ───────────────────────────────────────────────

/// Read a source file, send it straight to the gateway with the analysis
/// template, print the report, exit. The session and memory file are never
/// touched.
pub async fn run_analyze(settings: &Settings, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let gateway = OllamaGateway::from_settings(&settings.gateway);

    match analyze_source(&gateway, &content).await {
        Ok(report) => println!("{report}"),
        Err(e) => eprintln!("Error: {e}"),
    }

    Ok(())
}

// ── Worker task ─────────────────────────────────────────────────────────

/// Requests forwarded from the UI to the single exchange worker.
enum WorkerRequest {
    Chat(String),
    Voice,
    Analyze(PathBuf),
    SetMode(Directive),
}

/// Events reported back to the UI.
enum UiEvent {
    User(String),
    Assistant(String),
    System(String),
    /// The current request finished; the UI may accept input again.
    Done,
}

/// Owns the SessionController and processes requests strictly one at a
/// time — the serialization point for the whole exchange cycle.
async fn worker_loop(
    mut controller: SessionController,
    voice: VoiceSettings,
    mut request_rx: mpsc::UnboundedReceiver<WorkerRequest>,
    event_tx: mpsc::UnboundedSender<UiEvent>,
) {
    while let Some(request) = request_rx.recv().await {
        match request {
            WorkerRequest::Chat(input) => {
                run_exchange(&mut controller, &input, None, &event_tx).await;
            }
            WorkerRequest::Voice => {
                let settings = voice.clone();
                let heard = tokio::task::spawn_blocking(move || listen(&settings))
                    .await
                    .unwrap_or(Transcription::ServiceUnavailable);

                match heard {
                    Transcription::Recognized(text) => {
                        let _ = event_tx.send(UiEvent::User(text.clone()));
                        speak_blocking(&voice, replies::VOICE_ACK).await;
                        run_exchange(&mut controller, &text, Some(&voice), &event_tx).await;
                    }
                    failed => {
                        // Tagged failure: display the fixed string, never
                        // feed it into the session as speech.
                        if let Some(text) = failed.failure_text() {
                            let _ = event_tx.send(UiEvent::System(text.to_string()));
                        }
                    }
                }
            }
            WorkerRequest::Analyze(path) => match std::fs::read_to_string(&path) {
                Ok(content) => match controller.analyze(&content).await {
                    Ok(report) => {
                        let _ = event_tx.send(UiEvent::System(format!(
                            "Analysis of {}:\n{report}",
                            path.display()
                        )));
                    }
                    Err(e) => {
                        let _ = event_tx.send(UiEvent::System(format!("Error: {e}")));
                    }
                },
                Err(e) => {
                    let _ = event_tx.send(UiEvent::System(format!(
                        "Cannot read {}: {e}",
                        path.display()
                    )));
                }
            },
            WorkerRequest::SetMode(directive) => {
                controller.set_directive(directive);
                let _ = event_tx.send(UiEvent::System(format!("Mode: {}", directive.name())));
            }
        }

        let _ = event_tx.send(UiEvent::Done);
    }
}

async fn run_exchange(
    controller: &mut SessionController,
    input: &str,
    speak_reply: Option<&VoiceSettings>,
    event_tx: &mpsc::UnboundedSender<UiEvent>,
) {
    let outcome = controller.handle_input(input).await;

    if let Some(e) = &outcome.persist_error {
        let _ = event_tx.send(UiEvent::System(format!("Failed to save memory: {e}")));
    }

    if let Some(voice) = speak_reply {
        speak_blocking(voice, &outcome.reply).await;
    }

    let _ = event_tx.send(UiEvent::Assistant(outcome.reply));
}

async fn speak_blocking(voice: &VoiceSettings, text: &str) {
    let settings = voice.clone();
    let text = text.to_string();
    let result = tokio::task::spawn_blocking(move || speak(&settings, &text)).await;
    if let Ok(Err(e)) = result {
        tracing::warn!("TTS failed: {e}");
    }
}

// ── Interactive TUI ─────────────────────────────────────────────────────

#[derive(Clone)]
struct ChatMessage {
    role: MessageRole,
    content: String,
    timestamp: String,
}

#[derive(Clone, PartialEq)]
enum MessageRole {
    User,
    Assistant,
    System,
}

struct AppState {
    // Input
    input: String,
    cursor_pos: usize,
    input_history: Vec<String>,
    history_pos: Option<usize>,

    // Chat
    messages: Vec<ChatMessage>,
    scroll_offset: usize,

    // Processing state — one exchange in flight at a time
    is_processing: bool,

    // Status
    status_text: String,
    model_name: String,
    mode_name: String,
    memory_path: String,

    should_quit: bool,
}

impl AppState {
    fn new(settings: &Settings, directive: Directive) -> Self {
        Self {
            input: String::new(),
            cursor_pos: 0,
            input_history: Vec::new(),
            history_pos: None,

            messages: vec![ChatMessage {
                role: MessageRole::System,
                content: format!(
                    "Clawdbot v{} | {} | {} | memory: {}\n\
                     Type a message and press Enter. Prefix with search: for web search. /help for commands.",
                    env!("CARGO_PKG_VERSION"),
                    directive.name(),
                    settings.gateway.model,
                    settings.memory.path.display()
                ),
                timestamp: now_str(),
            }],
            scroll_offset: usize::MAX,

            is_processing: false,

            status_text: "Ready".into(),
            model_name: settings.gateway.model.clone(),
            mode_name: directive.name().into(),
            memory_path: settings.memory.path.display().to_string(),

            should_quit: false,
        }
    }

    fn add_message(&mut self, role: MessageRole, content: String) {
        self.messages.push(ChatMessage {
            role,
            content,
            timestamp: now_str(),
        });
        self.scroll_to_bottom();
    }

    fn scroll_to_bottom(&mut self) {
        // Resolved against the real line count on next draw
        self.scroll_offset = usize::MAX;
    }

    fn push_history(&mut self, input: String) {
        if !input.is_empty() && self.input_history.last() != Some(&input) {
            self.input_history.push(input);
        }
        self.history_pos = None;
    }

    fn history_prev(&mut self) {
        if self.input_history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            None => self.input_history.len().saturating_sub(1),
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.history_pos = Some(pos);
        self.input = self.input_history[pos].clone();
        self.cursor_pos = self.input.len();
    }

    fn history_next(&mut self) {
        match self.history_pos {
            None => {}
            Some(pos) => {
                if pos + 1 >= self.input_history.len() {
                    self.history_pos = None;
                    self.input.clear();
                    self.cursor_pos = 0;
                } else {
                    self.history_pos = Some(pos + 1);
                    self.input = self.input_history[pos + 1].clone();
                    self.cursor_pos = self.input.len();
                }
            }
        }
    }
}

pub async fn run_tui(settings: Settings, directive: Directive) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = AppState::new(&settings, directive);

    let gateway = OllamaGateway::from_settings(&settings.gateway);
    let store = MemoryStore::new(settings.memory.path.clone());
    let search = WebSearch::new(settings.search.max_results);
    let controller = SessionController::restore(directive, Box::new(gateway), search, store);

    // Replay persisted history into the message list
    for turn in controller.session().turns() {
        let role = match turn.role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        };
        state.messages.push(ChatMessage {
            role,
            content: turn.content.clone(),
            timestamp: now_str(),
        });
    }
    state.scroll_to_bottom();

    let (request_tx, request_rx) = mpsc::unbounded_channel::<WorkerRequest>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();

    let worker = tokio::spawn(worker_loop(
        controller,
        settings.voice.clone(),
        request_rx,
        event_tx,
    ));

    let result = event_loop(&mut terminal, &mut state, &request_tx, &mut event_rx);

    worker.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    request_tx: &mpsc::UnboundedSender<WorkerRequest>,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, state))?;

        if state.should_quit {
            return Ok(());
        }

        // Drain worker events without blocking the UI
        while let Ok(ui_event) = event_rx.try_recv() {
            match ui_event {
                UiEvent::User(text) => state.add_message(MessageRole::User, text),
                UiEvent::Assistant(text) => state.add_message(MessageRole::Assistant, text),
                UiEvent::System(text) => state.add_message(MessageRole::System, text),
                UiEvent::Done => {
                    state.is_processing = false;
                    state.status_text = "Ready".into();
                }
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key, state, request_tx);
                }
            }
        }
    }
}

fn handle_key(
    key: KeyEvent,
    state: &mut AppState,
    request_tx: &mpsc::UnboundedSender<WorkerRequest>,
) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Enter => submit_input(state, request_tx),
        KeyCode::Char(c) => {
            state.input.insert(state.cursor_pos, c);
            state.cursor_pos += c.len_utf8();
        }
        KeyCode::Backspace => {
            if state.cursor_pos > 0 {
                let prev = floor_char_boundary(&state.input, state.cursor_pos - 1);
                state.input.remove(prev);
                state.cursor_pos = prev;
            }
        }
        KeyCode::Left => {
            if state.cursor_pos > 0 {
                state.cursor_pos = floor_char_boundary(&state.input, state.cursor_pos - 1);
            }
        }
        KeyCode::Right => {
            if state.cursor_pos < state.input.len() {
                state.cursor_pos = ceil_char_boundary(&state.input, state.cursor_pos + 1);
            }
        }
        KeyCode::Home => state.cursor_pos = 0,
        KeyCode::End => state.cursor_pos = state.input.len(),
        KeyCode::Up => state.history_prev(),
        KeyCode::Down => state.history_next(),
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
        }
        KeyCode::Esc => state.should_quit = true,
        _ => {}
    }
}

fn submit_input(state: &mut AppState, request_tx: &mpsc::UnboundedSender<WorkerRequest>) {
    let input = state.input.trim().to_string();
    if input.is_empty() {
        return;
    }

    state.input.clear();
    state.cursor_pos = 0;
    state.push_history(input.clone());

    match crate::commands::handle_command(&input) {
        crate::commands::CommandResult::NotACommand => {
            if state.is_processing {
                state.add_message(
                    MessageRole::System,
                    "Still waiting on the previous exchange.".into(),
                );
                return;
            }
            state.add_message(MessageRole::User, input.clone());
            state.is_processing = true;
            state.status_text = if SessionController::is_search_command(&input) {
                "Searching...".into()
            } else {
                "Thinking...".into()
            };
            let _ = request_tx.send(WorkerRequest::Chat(input));
        }
        crate::commands::CommandResult::Message(text) => {
            state.add_message(MessageRole::System, text);
        }
        crate::commands::CommandResult::Quit => state.should_quit = true,
        crate::commands::CommandResult::ModeChanged(name) => match name.parse::<Directive>() {
            Ok(directive) => {
                state.mode_name = directive.name().into();
                let _ = request_tx.send(WorkerRequest::SetMode(directive));
            }
            Err(e) => state.add_message(MessageRole::System, e),
        },
        crate::commands::CommandResult::Voice => {
            if state.is_processing {
                state.add_message(
                    MessageRole::System,
                    "Still waiting on the previous exchange.".into(),
                );
                return;
            }
            state.is_processing = true;
            state.status_text = "Listening...".into();
            let _ = request_tx.send(WorkerRequest::Voice);
        }
        crate::commands::CommandResult::Analyze(path) => {
            if state.is_processing {
                state.add_message(
                    MessageRole::System,
                    "Still waiting on the previous exchange.".into(),
                );
                return;
            }
            state.is_processing = true;
            state.status_text = "Analyzing...".into();
            let _ = request_tx.send(WorkerRequest::Analyze(PathBuf::from(path)));
        }
        crate::commands::CommandResult::ShowStatus => {
            let status = format!(
                "Mode: {}\nModel: {}\nMemory: {}\nMessages shown: {}",
                state.mode_name,
                state.model_name,
                state.memory_path,
                state.messages.len()
            );
            state.add_message(MessageRole::System, status);
        }
    }
}

fn draw(f: &mut ratatui::Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // message list
            Constraint::Length(3), // input box
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    // Message list
    let mut lines: Vec<Line> = Vec::new();
    for msg in &state.messages {
        let (label, style) = match msg.role {
            MessageRole::User => ("you", Style::default().fg(Color::Cyan)),
            MessageRole::Assistant => ("clawdbot", Style::default().fg(Color::Green)),
            MessageRole::System => ("*", Style::default().fg(Color::DarkGray)),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{label} "),
                style.add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("[{}]", msg.timestamp), Style::default().fg(Color::DarkGray)),
        ]));
        for content_line in msg.content.lines() {
            lines.push(Line::from(content_line.to_string()));
        }
        lines.push(Line::default());
    }

    let view_height = chunks[0].height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(view_height);
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }

    let messages = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Clawdbot "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset as u16, 0));
    f.render_widget(messages, chunks[0]);

    // Input box
    let input_title = if state.is_processing {
        format!(" {} ", state.status_text)
    } else {
        " Ask Clawdbot... ".to_string()
    };
    let input = Paragraph::new(state.input.as_str())
        .block(Block::default().borders(Borders::ALL).title(input_title));
    f.render_widget(input, chunks[1]);

    // Status bar
    let status = Line::from(vec![
        Span::styled(
            format!(" {} ", state.mode_name),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(format!(" {} | {} | {}", state.model_name, state.memory_path, state.status_text)),
    ]);
    f.render_widget(Paragraph::new(status), chunks[2]);

    // Cursor inside the input box
    let cursor_x = chunks[1].x + 1 + state.input[..state.cursor_pos].chars().count() as u16;
    f.set_cursor_position((cursor_x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1));
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

fn now_str() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
