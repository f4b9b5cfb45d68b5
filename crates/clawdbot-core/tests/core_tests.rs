use std::sync::{Arc, Mutex};

use clawdbot_core::config::Settings;
use clawdbot_core::error::ClawdError;
use clawdbot_core::gateway::ModelGateway;
use clawdbot_core::search::WebSearch;
use clawdbot_core::session::{
    assemble, Directive, MemoryStore, ReplySource, Role, SessionController, Turn,
};
use tempfile::TempDir;

// ========================================================================
// Test gateways
// ========================================================================

/// Replies with a fixed string and records every prompt it sees.
struct CannedGateway {
    reply: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl CannedGateway {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn prompts_handle(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait::async_trait]
impl ModelGateway for CannedGateway {
    async fn generate(&self, prompt: &str) -> Result<String, ClawdError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    async fn generate_oneshot(&self, prompt: &str) -> Result<String, ClawdError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Fails every request, as an unreachable or timed-out endpoint would.
struct FailingGateway;

#[async_trait::async_trait]
impl ModelGateway for FailingGateway {
    async fn generate(&self, _prompt: &str) -> Result<String, ClawdError> {
        Err(ClawdError::Gateway("connection refused".to_string()))
    }

    async fn generate_oneshot(&self, _prompt: &str) -> Result<String, ClawdError> {
        Err(ClawdError::Gateway("connection refused".to_string()))
    }
}

fn controller_in(
    dir: &TempDir,
    gateway: Box<dyn ModelGateway>,
) -> (SessionController, MemoryStore) {
    let path = dir.path().join("memory.json");
    let controller = SessionController::restore(
        Directive::ChatAssistant,
        gateway,
        WebSearch::default(),
        MemoryStore::new(&path),
    );
    (controller, MemoryStore::new(&path))
}

// ========================================================================
// Settings Tests (config/mod.rs)
// ========================================================================

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert_eq!(settings.gateway.model, "llama3:8b-instruct-q4_0");
    assert_eq!(settings.gateway.base_url, "http://localhost:11434");
    assert_eq!(settings.gateway.keep_alive, "10m");
    assert_eq!(settings.gateway.chat_timeout_secs, 180);
    assert_eq!(settings.gateway.analyze_timeout_secs, 120);
    assert_eq!(settings.search.max_results, 3);
    assert_eq!(settings.memory.path.to_str(), Some("memory.json"));
}

#[test]
fn test_settings_toml_roundtrip() {
    let mut settings = Settings::default();
    settings.gateway.model = "test-model".to_string();
    settings.gateway.chat_timeout_secs = 42;

    let content = toml::to_string_pretty(&settings).unwrap();
    let loaded: Settings = toml::from_str(&content).unwrap();

    assert_eq!(loaded.gateway.model, "test-model");
    assert_eq!(loaded.gateway.chat_timeout_secs, 42);
    assert_eq!(loaded.voice.tts_command, settings.voice.tts_command);
}

// ========================================================================
// MemoryStore Tests (session/store.rs)
// ========================================================================

#[test]
fn test_store_roundtrip_preserves_roles_and_content() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new(dir.path().join("memory.json"));

    let turns = vec![
        Turn::user("line one\nline two"),
        Turn::assistant("résumé — naïve 🤖"),
        Turn::user("plain"),
    ];
    store.save(&turns).unwrap();

    assert_eq!(store.load().unwrap(), turns);
}

#[test]
fn test_store_serializes_flat_role_content_objects() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.json");
    let store = MemoryStore::new(&path);

    store
        .save(&[Turn::user("hi"), Turn::assistant("hello")])
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[0]["role"], "user");
    assert_eq!(raw[0]["content"], "hi");
    assert_eq!(raw[1]["role"], "assistant");
    assert_eq!(raw.as_array().unwrap().len(), 2);
}

// ========================================================================
// Prompt Assembly Tests (session/prompt.rs)
// ========================================================================

#[test]
fn test_assemble_golden_output() {
    let turns = vec![Turn::user("hi")];
    assert_eq!(
        assemble("You are a helpful AI assistant.", &turns),
        "You are a helpful AI assistant.\nuser: hi\nassistant:"
    );
}

#[test]
fn test_assemble_includes_full_history_in_order() {
    let turns = vec![
        Turn::user("first"),
        Turn::assistant("second"),
        Turn::user("third"),
    ];
    let prompt = assemble("D", &turns);
    assert_eq!(prompt, "D\nuser: first\nassistant: second\nuser: third\nassistant:");
}

// ========================================================================
// SessionController Tests (session/controller.rs)
// ========================================================================

#[tokio::test]
async fn test_exchange_appends_two_turns_and_persists() {
    let dir = TempDir::new().unwrap();
    let (mut controller, store) = controller_in(&dir, Box::new(CannedGateway::new("hello!")));

    let outcome = controller.handle_input("hi").await;

    assert_eq!(outcome.reply, "hello!");
    assert_eq!(outcome.source, ReplySource::Model);
    assert!(outcome.persist_error.is_none());
    assert_eq!(controller.session().len(), 2);

    let persisted = store.load().unwrap();
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0], Turn::user("hi"));
    assert_eq!(persisted[1], Turn::assistant("hello!"));
}

#[tokio::test]
async fn test_n_exchanges_grow_session_to_2n_turns() {
    let dir = TempDir::new().unwrap();
    let (mut controller, store) = controller_in(&dir, Box::new(CannedGateway::new("ok")));

    for i in 0..4 {
        controller.handle_input(&format!("message {i}")).await;
    }

    assert_eq!(controller.session().len(), 8);
    let turns = controller.session().turns();
    for (i, pair) in turns.chunks(2).enumerate() {
        assert_eq!(pair[0], Turn::user(format!("message {i}")));
        assert_eq!(pair[1].role, Role::Assistant);
    }
    assert_eq!(store.load().unwrap().len(), 8);
}

#[tokio::test]
async fn test_model_query_reaches_gateway_with_assembled_prompt() {
    let dir = TempDir::new().unwrap();
    let gateway = CannedGateway::new("reply");
    let prompts = gateway.prompts_handle();
    let (mut controller, _) = controller_in(&dir, Box::new(gateway));

    controller.handle_input("what is rust?").await;

    let prompts = prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(
        prompts[0],
        "You are a helpful AI assistant.\nuser: what is rust?\nassistant:"
    );
}

#[tokio::test]
async fn test_search_command_never_reaches_gateway() {
    let dir = TempDir::new().unwrap();
    let gateway = CannedGateway::new("should not be called");
    let prompts = gateway.prompts_handle();
    let (mut controller, store) = controller_in(&dir, Box::new(gateway));

    let outcome = controller.handle_input("Search: rust ownership").await;

    assert_eq!(outcome.source, ReplySource::Search);
    assert!(prompts.lock().unwrap().is_empty());
    // The exchange still contributes exactly two turns and persists, whether
    // the search itself succeeded or degraded to an error line.
    assert_eq!(controller.session().len(), 2);
    assert_eq!(store.load().unwrap().len(), 2);
}

#[tokio::test]
async fn test_gateway_failure_becomes_placeholder_turn() {
    let dir = TempDir::new().unwrap();
    let (mut controller, store) = controller_in(&dir, Box::new(FailingGateway));

    let outcome = controller.handle_input("hi").await;

    assert!(outcome.reply.starts_with("⚠️ Error connecting to model:"));
    assert!(outcome.persist_error.is_none());

    let persisted = store.load().unwrap();
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[1].role, Role::Assistant);
    assert!(persisted[1].content.contains("connection refused"));
}

#[tokio::test]
async fn test_empty_history_bootstrap() {
    let dir = TempDir::new().unwrap();
    let (mut controller, _) = controller_in(&dir, Box::new(CannedGateway::new("first reply")));

    assert!(controller.session().is_empty());

    controller.handle_input("hello").await;
    assert_eq!(controller.session().len(), 2);
}

#[tokio::test]
async fn test_restore_loads_persisted_turns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.json");
    MemoryStore::new(&path)
        .save(&[Turn::user("earlier"), Turn::assistant("reply")])
        .unwrap();

    let controller = SessionController::restore(
        Directive::ChatAssistant,
        Box::new(CannedGateway::new("ok")),
        WebSearch::default(),
        MemoryStore::new(&path),
    );

    assert_eq!(controller.session().len(), 2);
    assert_eq!(controller.session().turns()[0], Turn::user("earlier"));
}

#[tokio::test]
async fn test_restore_with_malformed_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.json");
    std::fs::write(&path, "{ definitely not a turn array").unwrap();

    let controller = SessionController::restore(
        Directive::ChatAssistant,
        Box::new(CannedGateway::new("ok")),
        WebSearch::default(),
        MemoryStore::new(&path),
    );

    assert!(controller.session().is_empty());
}

#[tokio::test]
async fn test_analyze_bypasses_session_and_persistence() {
    let dir = TempDir::new().unwrap();
    let gateway = CannedGateway::new("looks fine");
    let prompts = gateway.prompts_handle();
    let (controller, store) = controller_in(&dir, Box::new(gateway));

    let result = controller.analyze("fn main() {}").await.unwrap();

    assert_eq!(result, "looks fine");
    assert_eq!(
        prompts.lock().unwrap()[0],
        "Analyze this code and suggest improvements:\n\nfn main() {}"
    );
    assert!(controller.session().is_empty());
    assert!(store.load().unwrap().is_empty());
}
