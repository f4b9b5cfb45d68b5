use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig, StreamError};
use hound::{WavSpec, WavWriter};

use crate::error::ClawdError;

/// 16 kHz mono 16-bit: the rate Whisper-family transcribers expect.
const SAMPLE_RATE: u32 = 16000;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Record from the default input device for a fixed duration.
pub fn record_clip(duration: Duration) -> Result<Vec<i16>, ClawdError> {
    let device = default_input_device()?;
    let config = input_config();
    let samples: Arc<Mutex<Vec<i16>>> = Arc::new(Mutex::new(Vec::new()));

    let stream = build_input_stream(&device, &config, samples.clone())?;
    stream
        .play()
        .map_err(|e| ClawdError::Voice(format!("Failed to start capture: {e}")))?;
    std::thread::sleep(duration);
    drop(stream);

    let samples = samples.lock().unwrap_or_else(|e| e.into_inner());
    Ok(samples.clone())
}

/// Encode PCM samples as an in-memory WAV file.
pub fn encode_wav(samples: &[i16]) -> Result<Vec<u8>, ClawdError> {
    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| ClawdError::Voice(format!("WAV encode error: {e}")))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| ClawdError::Voice(format!("WAV encode error: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| ClawdError::Voice(format!("WAV encode error: {e}")))?;
    }

    Ok(cursor.into_inner())
}

fn default_input_device() -> Result<Device, ClawdError> {
    cpal::default_host()
        .default_input_device()
        .ok_or_else(|| ClawdError::Voice("No input device".to_string()))
}

fn input_config() -> StreamConfig {
    StreamConfig {
        channels: CHANNELS,
        sample_rate: cpal::SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Default,
    }
}

fn build_input_stream(
    device: &Device,
    config: &StreamConfig,
    samples: Arc<Mutex<Vec<i16>>>,
) -> Result<Stream, ClawdError> {
    device
        .build_input_stream(
            config,
            move |data: &[f32], _: &_| push_samples(&samples, data),
            log_stream_error,
            None,
        )
        .map_err(|e| ClawdError::Voice(format!("Failed to open input stream: {e}")))
}

fn push_samples(buffer: &Arc<Mutex<Vec<i16>>>, data: &[f32]) {
    let mut guard = buffer.lock().unwrap_or_else(|e| e.into_inner());
    for &sample in data {
        guard.push((sample * i16::MAX as f32) as i16);
    }
}

fn log_stream_error(error: StreamError) {
    tracing::warn!("Audio stream error: {error}");
}
