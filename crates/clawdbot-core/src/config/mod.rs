use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{defaults, endpoints, models, paths};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub gateway: GatewaySettings,
    pub memory: MemorySettings,
    pub search: SearchSettings,
    pub voice: VoiceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    pub model: String,
    pub base_url: String,
    pub keep_alive: String,
    pub temperature: f32,
    pub num_predict: u32,
    pub chat_timeout_secs: u64,
    pub analyze_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    pub max_results: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub tts_command: String,
    pub transcribe_url: String,
    pub record_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gateway: GatewaySettings {
                model: models::DEFAULT_MODEL.to_string(),
                base_url: endpoints::OLLAMA_BASE_URL.to_string(),
                keep_alive: defaults::KEEP_ALIVE.to_string(),
                temperature: defaults::TEMPERATURE,
                num_predict: defaults::NUM_PREDICT,
                chat_timeout_secs: defaults::CHAT_TIMEOUT_SECS,
                analyze_timeout_secs: defaults::ANALYZE_TIMEOUT_SECS,
            },
            memory: MemorySettings {
                path: PathBuf::from(defaults::MEMORY_FILE),
            },
            search: SearchSettings {
                max_results: defaults::SEARCH_MAX_RESULTS,
            },
            voice: VoiceSettings {
                tts_command: defaults::TTS_COMMAND.to_string(),
                transcribe_url: endpoints::TRANSCRIBE_URL.to_string(),
                record_secs: defaults::RECORD_SECS,
            },
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    pub fn load() -> Self {
        let config_path = Self::config_path();
        if config_path.exists() {
            if let Ok(content) = std::fs::read_to_string(&config_path) {
                if let Ok(config) = toml::from_str(&content) {
                    return config;
                }
                tracing::warn!("Ignoring malformed config at {}", config_path.display());
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), crate::error::ClawdError> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ClawdError::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}
