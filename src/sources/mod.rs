// Sources module - collaborator contracts for the measurement channels
//
// The engagement core consumes three external observation channels: the
// student-facing emotion model, the student-facing ambient microphone, and
// the teacher-facing speech capture/transcription pair. Each is a black box
// behind a trait here; the cycles only ever see the contract.
//
// Implementations:
// - microphone: cpal-backed capture for the ambient and speech channels
// - remote: HTTP clients for cloud transcription and the emotion sidecar
// - simulated: rand-driven stand-ins for machines without camera/microphone

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

pub mod microphone;
pub mod remote;
pub mod simulated;

/// Dominant classroom emotion reported by the vision model
///
/// The label set follows the emotion model's output vocabulary. Anything
/// the model emits outside this set deserializes as `Unknown` and scores
/// neutrally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Fear,
    Surprise,
    Neutral,
    Disgust,
    #[serde(other)]
    Unknown,
}

/// Ambient classroom loudness category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioState {
    Silent,
    Quiet,
    Active,
}

/// Mean absolute amplitude below which the room counts as silent
pub const SILENT_AMPLITUDE: f32 = 0.01;
/// Mean absolute amplitude below which the room counts as normally quiet
pub const QUIET_AMPLITUDE: f32 = 0.05;

/// Classify a mean absolute amplitude into an ambient audio state
pub fn classify_ambient(volume: f32) -> (AudioState, String) {
    if volume < SILENT_AMPLITUDE {
        (
            AudioState::Silent,
            "Dead silence - students may be confused".to_string(),
        )
    } else if volume < QUIET_AMPLITUDE {
        (AudioState::Quiet, "Normal classroom sound".to_string())
    } else {
        (AudioState::Active, "Active discussion happening".to_string())
    }
}

/// A captured mono audio clip
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Clip length in minutes, 0.0 for an empty or rate-less clip
    pub fn duration_minutes(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64 / 60.0
    }

    /// Mean absolute amplitude over the whole clip
    pub fn mean_amplitude(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.samples.iter().map(|s| s.abs()).sum();
        sum / self.samples.len() as f32
    }
}

/// Student-facing emotion channel
///
/// Implementations observe the classroom for a fixed multi-second window
/// and report the dominant emotion. The call blocks for the window and
/// never fails; when nothing is detected it returns `Neutral`.
pub trait EmotionSource: Send + Sync {
    fn sample_emotion(&self) -> Emotion;
}

/// Student-facing ambient loudness channel
///
/// Blocks for `duration` while listening, then classifies the mean
/// absolute amplitude. Never fails; an unavailable microphone degrades to
/// `Quiet` with an explanatory message.
pub trait AmbientAudioSource: Send + Sync {
    fn sample_audio(&self, duration: Duration) -> (AudioState, String);
}

/// Teacher-facing speech capture channel
///
/// Blocks for roughly `duration` while recording a mono clip.
pub trait SpeechRecorder: Send + Sync {
    fn record(&self, duration: Duration) -> Result<AudioClip, SpeechError>;
}

/// Speech-to-text channel
///
/// Fails with `Unintelligible` when the clip carries no recognizable
/// speech and `ServiceUnavailable` when the backing service cannot be
/// reached.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, clip: &AudioClip) -> Result<String, SpeechError>;
}
