mod audio;

use std::time::Duration;

use serde::Deserialize;

use crate::config::VoiceSettings;
use crate::constants::replies;
use crate::error::ClawdError;

/// Outcome of one microphone capture. Failure kinds are distinct variants so
/// callers can branch without string-matching a sentinel reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Recognized(String),
    /// The clip reached the transcriber but produced no usable text.
    Unrecognized,
    /// Capture or the transcription service itself failed.
    ServiceUnavailable,
}

impl Transcription {
    /// The fixed human-readable rendering for the failure variants.
    pub fn failure_text(&self) -> Option<&'static str> {
        match self {
            Transcription::Recognized(_) => None,
            Transcription::Unrecognized => Some(replies::UNRECOGNIZED_AUDIO),
            Transcription::ServiceUnavailable => Some(replies::SPEECH_UNAVAILABLE),
        }
    }
}

/// Record a fixed-duration clip from the default microphone and transcribe
/// it. Blocks for the whole capture plus the transcription round trip — run
/// it off the async executor.
pub fn listen(settings: &VoiceSettings) -> Transcription {
    let clip = Duration::from_secs(settings.record_secs);

    let samples = match audio::record_clip(clip) {
        Ok(samples) => samples,
        Err(e) => {
            tracing::warn!("Audio capture failed: {e}");
            return Transcription::ServiceUnavailable;
        }
    };

    let wav = match audio::encode_wav(&samples) {
        Ok(wav) => wav,
        Err(e) => {
            tracing::warn!("WAV encoding failed: {e}");
            return Transcription::ServiceUnavailable;
        }
    };

    match transcribe(&settings.transcribe_url, wav) {
        Ok(text) if text.trim().is_empty() => Transcription::Unrecognized,
        Ok(text) => Transcription::Recognized(text.trim().to_string()),
        Err(e) => {
            tracing::warn!("Transcription failed: {e}");
            Transcription::ServiceUnavailable
        }
    }
}

/// Render text as audio through the configured system TTS command and wait
/// for it to finish. No cancellation.
pub fn speak(settings: &VoiceSettings, text: &str) -> Result<(), ClawdError> {
    if text.trim().is_empty() {
        return Err(ClawdError::Voice("Cannot speak empty text".to_string()));
    }

    let output = std::process::Command::new(&settings.tts_command)
        .arg(text)
        .output()
        .map_err(|e| ClawdError::Voice(format!("Failed to run {}: {e}", settings.tts_command)))?;

    if !output.status.success() {
        return Err(ClawdError::Voice(format!(
            "{} exited with {}",
            settings.tts_command, output.status
        )));
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    text: String,
}

/// Upload a WAV clip to the Whisper-compatible endpoint and return the
/// transcript text.
fn transcribe(url: &str, wav: Vec<u8>) -> Result<String, ClawdError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let part = reqwest::blocking::multipart::Part::bytes(wav)
        .file_name("clip.wav")
        .mime_str("audio/wav")?;
    let form = reqwest::blocking::multipart::Form::new()
        .part("file", part)
        .text("response_format", "json");

    let response = client.post(url).multipart(form).send()?;

    let status = response.status();
    let body = response.text()?;

    if !status.is_success() {
        return Err(ClawdError::Voice(format!(
            "Transcription endpoint error ({status}): {body}"
        )));
    }

    let parsed: TranscribeResponse = serde_json::from_str(&body)
        .map_err(|e| ClawdError::Voice(format!("Failed to parse transcription: {e}")))?;

    Ok(parsed.text)
}
