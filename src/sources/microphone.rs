// Microphone-backed collaborators (cpal input stream)
//
// One short-lived input stream per observation window: open the default
// device, append mono samples for the requested duration, close the
// stream. The callback only copies samples; all classification happens
// after the window closes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, warn};

use crate::error::{ErrorCode, SpeechError};
use crate::sources::{
    classify_ambient, AmbientAudioSource, AudioClip, AudioState, SpeechRecorder,
};

/// Blocking microphone recorder
pub struct MicrophoneRecorder;

impl MicrophoneRecorder {
    pub fn new() -> Self {
        Self
    }

    fn capture(&self, duration: Duration) -> Result<AudioClip, SpeechError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| SpeechError::CaptureFailed {
                reason: "No default input device found".to_string(),
            })?;

        let supported = device
            .default_input_config()
            .map_err(|e| SpeechError::CaptureFailed {
                reason: format!("Failed to get default input config: {:?}", e),
            })?;

        let stream_config: cpal::StreamConfig = supported.clone().into();
        let sample_rate = stream_config.sample_rate.0;
        let channel_count = stream_config.channels as usize;

        let capacity = sample_rate as usize * duration.as_secs().max(1) as usize;
        let sink: Arc<Mutex<Vec<f32>>> = Arc::new(Mutex::new(Vec::with_capacity(capacity)));

        let err_fn = |err| warn!("[Microphone] Input stream error: {}", err);

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                let sink = Arc::clone(&sink);
                device.build_input_stream(
                    &stream_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        push_mono(&sink, data, channel_count, |s| s);
                    },
                    err_fn,
                    None,
                )
            }
            cpal::SampleFormat::I16 => {
                let sink = Arc::clone(&sink);
                device.build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        push_mono(&sink, data, channel_count, |s| s as f32 / 32_768.0);
                    },
                    err_fn,
                    None,
                )
            }
            cpal::SampleFormat::U16 => {
                let sink = Arc::clone(&sink);
                device.build_input_stream(
                    &stream_config,
                    move |data: &[u16], _: &cpal::InputCallbackInfo| {
                        push_mono(&sink, data, channel_count, |s| {
                            (s as f32 - 32_768.0) / 32_768.0
                        });
                    },
                    err_fn,
                    None,
                )
            }
            other => {
                return Err(SpeechError::CaptureFailed {
                    reason: format!("Unsupported sample format {:?}", other),
                })
            }
        }
        .map_err(|e| SpeechError::CaptureFailed {
            reason: format!("Failed to open input stream: {:?}", e),
        })?;

        stream.play().map_err(|e| SpeechError::CaptureFailed {
            reason: format!("Failed to start input stream: {:?}", e),
        })?;

        std::thread::sleep(duration);
        drop(stream);

        let mut guard = sink.lock().map_err(|_| SpeechError::CaptureFailed {
            reason: "capture buffer lock poisoned".to_string(),
        })?;
        let samples = std::mem::take(&mut *guard);
        debug!(
            "[Microphone] Captured {} samples at {} Hz",
            samples.len(),
            sample_rate
        );
        Ok(AudioClip::new(samples, sample_rate))
    }
}

impl Default for MicrophoneRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechRecorder for MicrophoneRecorder {
    fn record(&self, duration: Duration) -> Result<AudioClip, SpeechError> {
        self.capture(duration)
    }
}

/// De-interleave: take the first channel only
fn push_mono<T: Copy>(
    sink: &Arc<Mutex<Vec<f32>>>,
    data: &[T],
    channel_count: usize,
    convert: impl Fn(T) -> f32,
) {
    if let Ok(mut buffer) = sink.lock() {
        if channel_count <= 1 {
            buffer.extend(data.iter().map(|&s| convert(s)));
        } else {
            for frame in data.chunks(channel_count) {
                if let Some(&first) = frame.first() {
                    buffer.push(convert(first));
                }
            }
        }
    }
}

/// Ambient loudness source listening through the same recorder
///
/// Capture failures degrade to `Quiet` with an explanatory message; the
/// ambient channel never raises past this boundary.
pub struct MicrophoneAmbientSource {
    recorder: MicrophoneRecorder,
}

impl MicrophoneAmbientSource {
    pub fn new() -> Self {
        Self {
            recorder: MicrophoneRecorder::new(),
        }
    }
}

impl Default for MicrophoneAmbientSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AmbientAudioSource for MicrophoneAmbientSource {
    fn sample_audio(&self, duration: Duration) -> (AudioState, String) {
        match self.recorder.capture(duration) {
            Ok(clip) => {
                let volume = clip.mean_amplitude();
                debug!("[Ambient] Volume level: {:.4}", volume);
                classify_ambient(volume)
            }
            Err(err) => {
                warn!("[Ambient] Capture failed, degrading to quiet: {}", err);
                (
                    AudioState::Quiet,
                    format!("Microphone unavailable: {}", err.message()),
                )
            }
        }
    }
}
