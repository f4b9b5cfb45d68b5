use crate::error::ClawdError;

/// The text-generation endpoint seam. Implementations own their transport
/// configuration (model, endpoint, timeouts); callers hand over a fully
/// assembled prompt and receive the generated text.
#[async_trait::async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generate a reply for a full-history chat prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ClawdError>;

    /// Generate a reply for a stateless one-shot prompt (file analysis).
    /// Uses the shorter analysis timeout and no session-oriented options.
    async fn generate_oneshot(&self, prompt: &str) -> Result<String, ClawdError>;
}
