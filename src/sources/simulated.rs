// Simulated measurement sources
//
// Drop-in collaborators for machines without a camera or microphone. They
// block for the same observation windows as the real sources and produce
// plausible randomized measurements, so the full cycle machinery can run
// end to end on any development box.

use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::error::SpeechError;
use crate::sources::{
    classify_ambient, AmbientAudioSource, AudioClip, AudioState, Emotion, EmotionSource,
    SpeechRecorder, Transcriber,
};

/// Emotion source drawing from a classroom-shaped distribution
pub struct SimulatedEmotionSource {
    window: Duration,
}

impl SimulatedEmotionSource {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }
}

impl EmotionSource for SimulatedEmotionSource {
    fn sample_emotion(&self) -> Emotion {
        thread::sleep(self.window);
        // Mostly attentive classrooms, occasionally not
        match rand::thread_rng().gen_range(0..100) {
            0..=44 => Emotion::Neutral,
            45..=74 => Emotion::Happy,
            75..=84 => Emotion::Surprise,
            85..=89 => Emotion::Sad,
            90..=94 => Emotion::Fear,
            _ => Emotion::Angry,
        }
    }
}

/// Ambient source producing a random low-level volume
pub struct SimulatedAmbientSource;

impl AmbientAudioSource for SimulatedAmbientSource {
    fn sample_audio(&self, duration: Duration) -> (AudioState, String) {
        thread::sleep(duration);
        let volume = rand::thread_rng().gen_range(0.0..0.08);
        classify_ambient(volume)
    }
}

/// Recorder synthesizing a vibrato voice-band tone with noise
pub struct SimulatedRecorder {
    sample_rate: u32,
}

impl SimulatedRecorder {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl SpeechRecorder for SimulatedRecorder {
    fn record(&self, duration: Duration) -> Result<AudioClip, SpeechError> {
        thread::sleep(duration);

        let mut rng = rand::thread_rng();
        let count = (duration.as_secs_f64() * self.sample_rate as f64) as usize;
        let rate = self.sample_rate as f32;
        let samples = (0..count)
            .map(|i| {
                let t = i as f32 / rate;
                // 180 Hz carrier swept +-40 Hz at 3 Hz, like animated speech
                let freq = 180.0 + 40.0 * (2.0 * std::f32::consts::PI * 3.0 * t).sin();
                let tone = 0.1 * (2.0 * std::f32::consts::PI * freq * t).sin();
                tone + rng.gen_range(-0.005..0.005)
            })
            .collect();

        Ok(AudioClip::new(samples, self.sample_rate))
    }
}

/// Transcriber emitting a canned lecture at a fixed speaking rate
pub struct SimulatedTranscriber {
    wpm: f64,
}

const LECTURE_WORDS: [&str; 11] = [
    "today", "we", "review", "the", "lesson", "and", "work", "through", "an", "example",
    "together",
];

impl SimulatedTranscriber {
    pub fn new() -> Self {
        Self { wpm: 140.0 }
    }

    pub fn with_wpm(wpm: f64) -> Self {
        Self { wpm }
    }
}

impl Default for SimulatedTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber for SimulatedTranscriber {
    fn transcribe(&self, clip: &AudioClip) -> Result<String, SpeechError> {
        if clip.samples.is_empty() {
            return Err(SpeechError::Unintelligible);
        }
        let word_count = (clip.duration_minutes() * self.wpm).round() as usize;
        let transcript: Vec<&str> = LECTURE_WORDS.iter().cycle().take(word_count).copied().collect();
        Ok(transcript.join(" "))
    }
}
