mod ollama;
mod traits;

pub use ollama::OllamaGateway;
pub use traits::ModelGateway;
