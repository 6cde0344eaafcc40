//! Scripted collaborator implementations.
//!
//! Each source returns exactly what the test scripted, so cycle behavior
//! can be asserted without hardware. The gated recorder additionally
//! blocks inside `record` until the test releases it, which is how the
//! concurrency tests hold a speech cycle open at a known point.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::SpeechError;
use crate::sources::{
    AmbientAudioSource, AudioClip, AudioState, Emotion, EmotionSource, SpeechRecorder, Transcriber,
};

/// Generate a sine clip for tone-analysis tests
pub fn sine_clip(freq: f32, secs: f32, sample_rate: u32, amplitude: f32) -> AudioClip {
    let count = (secs * sample_rate as f32) as usize;
    let samples = (0..count)
        .map(|i| {
            amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin()
        })
        .collect();
    AudioClip::new(samples, sample_rate)
}

/// Generate an n-word transcript
pub fn words(count: usize) -> String {
    vec!["word"; count].join(" ")
}

/// Emotion source returning one fixed label
pub struct ScriptedEmotionSource {
    emotion: Emotion,
}

impl ScriptedEmotionSource {
    pub fn fixed(emotion: Emotion) -> Self {
        Self { emotion }
    }
}

impl EmotionSource for ScriptedEmotionSource {
    fn sample_emotion(&self) -> Emotion {
        self.emotion
    }
}

/// Ambient source returning one fixed state
pub struct ScriptedAmbientSource {
    state: AudioState,
    message: String,
}

impl ScriptedAmbientSource {
    pub fn fixed(state: AudioState, message: &str) -> Self {
        Self {
            state,
            message: message.to_string(),
        }
    }
}

impl AmbientAudioSource for ScriptedAmbientSource {
    fn sample_audio(&self, _duration: Duration) -> (AudioState, String) {
        (self.state, self.message.clone())
    }
}

enum RecorderScript {
    Immediate(AudioClip),
    Failing(SpeechError),
    Gated(AudioClip, Mutex<Receiver<()>>),
}

/// Recorder following a fixed script
pub struct ScriptedRecorder {
    script: RecorderScript,
}

impl ScriptedRecorder {
    /// Returns the clip as soon as `record` is called
    pub fn immediate(clip: AudioClip) -> Self {
        Self {
            script: RecorderScript::Immediate(clip),
        }
    }

    /// Fails every `record` call with a clone of the error
    pub fn failing(err: SpeechError) -> Self {
        Self {
            script: RecorderScript::Failing(err),
        }
    }

    /// Blocks inside `record` until the returned sender releases it
    ///
    /// One message per `record` call; dropping the sender fails any
    /// still-blocked call with a capture error.
    pub fn gated(clip: AudioClip) -> (Self, Sender<()>) {
        let (tx, rx) = channel();
        (
            Self {
                script: RecorderScript::Gated(clip, Mutex::new(rx)),
            },
            tx,
        )
    }
}

impl SpeechRecorder for ScriptedRecorder {
    fn record(&self, _duration: Duration) -> Result<AudioClip, SpeechError> {
        match &self.script {
            RecorderScript::Immediate(clip) => Ok(clip.clone()),
            RecorderScript::Failing(err) => Err(err.clone()),
            RecorderScript::Gated(clip, gate) => {
                let gate = gate.lock().map_err(|_| SpeechError::CaptureFailed {
                    reason: "gate lock poisoned".to_string(),
                })?;
                gate.recv().map_err(|_| SpeechError::CaptureFailed {
                    reason: "gate closed".to_string(),
                })?;
                Ok(clip.clone())
            }
        }
    }
}

/// Transcriber returning one fixed result
pub struct ScriptedTranscriber {
    result: Result<String, SpeechError>,
}

impl ScriptedTranscriber {
    pub fn fixed(transcript: &str) -> Self {
        Self {
            result: Ok(transcript.to_string()),
        }
    }

    pub fn failing(err: SpeechError) -> Self {
        Self { result: Err(err) }
    }
}

impl Transcriber for ScriptedTranscriber {
    fn transcribe(&self, _clip: &AudioClip) -> Result<String, SpeechError> {
        self.result.clone()
    }
}
