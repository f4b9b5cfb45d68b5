pub mod config;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod search;
pub mod session;
pub mod voice;

// Re-export key types
pub use config::Settings;
pub use error::ClawdError;
pub use gateway::{ModelGateway, OllamaGateway};
pub use search::{SearchResult, WebSearch};
pub use session::{
    assemble, Directive, ExchangeOutcome, MemoryStore, ReplySource, Role, Session,
    SessionController, Turn,
};
pub use voice::{listen, speak, Transcription};
