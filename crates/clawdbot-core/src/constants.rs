/// Clawdbot — centralized constants.
/// All magic numbers, strings, and limits live here.
/// Never hardcode these values elsewhere.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    pub const DEFAULT_MODEL: &str = "llama3:8b-instruct-q4_0";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
    pub const GENERATE_PATH: &str = "/api/generate";
    pub const SEARCH_ENGINE_URL: &str = "https://html.duckduckgo.com/html/?q={}";
    pub const TRANSCRIBE_URL: &str = "http://localhost:8080/inference";
}

// ─── Generation Defaults ──────────────────────────────────────────────────────

pub mod defaults {
    pub const KEEP_ALIVE: &str = "10m";
    pub const TEMPERATURE: f32 = 0.6;
    pub const NUM_PREDICT: u32 = 400;
    pub const CHAT_TIMEOUT_SECS: u64 = 180;
    pub const ANALYZE_TIMEOUT_SECS: u64 = 120;
    pub const SEARCH_TIMEOUT_SECS: u64 = 15;
    pub const SEARCH_MAX_RESULTS: usize = 3;
    pub const MEMORY_FILE: &str = "memory.json";
    pub const TTS_COMMAND: &str = "say";
    pub const RECORD_SECS: u64 = 5;
}

// ─── Directives ───────────────────────────────────────────────────────────────

pub mod directives {
    pub const CODING_COPILOT: &str = "\
You are Clawdbot, an elite coding copilot.
Always respond with:
- Clean, production-ready code
- Proper formatting
- Short explanation after code
Support Python, JavaScript, C++, SQL.";

    pub const CHAT_ASSISTANT: &str = "You are a helpful AI assistant.";
}

// ─── Fixed Replies ────────────────────────────────────────────────────────────

pub mod replies {
    /// Returned when the gateway response body carries no generated text.
    pub const NO_RESPONSE: &str = "No response from model.";
    /// Prefix for the placeholder turn appended on gateway failure.
    pub const GATEWAY_ERROR_PREFIX: &str = "⚠️ Error connecting to model: ";
    /// Prefix for the turn appended on search failure.
    pub const SEARCH_ERROR_PREFIX: &str = "⚠️ Search failed: ";
    pub const NO_SEARCH_RESULTS: &str = "No results found.";
    /// Rendered for Transcription::Unrecognized.
    pub const UNRECOGNIZED_AUDIO: &str = "Sorry, I couldn't understand that.";
    /// Rendered for Transcription::ServiceUnavailable.
    pub const SPEECH_UNAVAILABLE: &str = "Speech service unavailable.";
    /// Spoken after a recognized voice utterance, before the exchange runs.
    pub const VOICE_ACK: &str = "Processing your request";
}

// ─── Prompt Templates ─────────────────────────────────────────────────────────

pub mod prompts {
    /// One-shot file-analysis template. The analyzed content replaces `{}`.
    pub const ANALYZE_TEMPLATE: &str = "Analyze this code and suggest improvements:\n\n{}";
    /// Marker appended after the flattened history so generation continues
    /// from the assistant's turn.
    pub const ASSISTANT_MARKER: &str = "assistant:";
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "clawdbot";
    pub const CONFIG_FILE: &str = "config.toml";
}
