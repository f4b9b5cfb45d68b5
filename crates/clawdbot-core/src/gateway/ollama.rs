use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::config::GatewaySettings;
use crate::constants::{endpoints, replies};
use crate::error::ClawdError;
use crate::gateway::traits::ModelGateway;

/// Client for a local Ollama generate endpoint.
///
/// Speaks the prompt-oriented `/api/generate` API: one flattened prompt in,
/// one completed reply out, `stream: false` always. Chat requests carry the
/// configured `keep_alive` and sampling options; one-shot requests send the
/// bare body.
pub struct OllamaGateway {
    client: reqwest::Client,
    model: String,
    base_url: String,
    keep_alive: String,
    temperature: f32,
    num_predict: u32,
    chat_timeout: Duration,
    analyze_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

impl OllamaGateway {
    pub fn new(model: impl Into<String>) -> Self {
        Self::from_settings(&GatewaySettings {
            model: model.into(),
            ..gateway_defaults()
        })
    }

    pub fn from_settings(settings: &GatewaySettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: settings.model.clone(),
            base_url: settings.base_url.clone(),
            keep_alive: settings.keep_alive.clone(),
            temperature: settings.temperature,
            num_predict: settings.num_predict,
            chat_timeout: Duration::from_secs(settings.chat_timeout_secs),
            analyze_timeout: Duration::from_secs(settings.analyze_timeout_secs),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request_body(&self, prompt: &str, oneshot: bool) -> Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        if !oneshot {
            body["keep_alive"] = Value::String(self.keep_alive.clone());
            body["options"] = serde_json::json!({
                "temperature": self.temperature,
                "num_predict": self.num_predict,
            });
        }

        body
    }

    async fn send(&self, prompt: &str, oneshot: bool, timeout: Duration) -> Result<String, ClawdError> {
        let url = format!("{}{}", self.base_url, endpoints::GENERATE_PATH);
        let request_body = self.build_request_body(prompt, oneshot);

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(ClawdError::Gateway(format!(
                "Generate endpoint error ({}): {}",
                status, response_text
            )));
        }

        let api_response: GenerateResponse = serde_json::from_str(&response_text)
            .map_err(|e| ClawdError::Gateway(format!("Failed to parse response: {e}")))?;

        Ok(api_response
            .response
            .unwrap_or_else(|| replies::NO_RESPONSE.to_string()))
    }
}

#[async_trait::async_trait]
impl ModelGateway for OllamaGateway {
    async fn generate(&self, prompt: &str) -> Result<String, ClawdError> {
        self.send(prompt, false, self.chat_timeout).await
    }

    async fn generate_oneshot(&self, prompt: &str) -> Result<String, ClawdError> {
        self.send(prompt, true, self.analyze_timeout).await
    }
}

fn gateway_defaults() -> GatewaySettings {
    crate::config::Settings::default().gateway
}
