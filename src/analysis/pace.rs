// Pace classifier - heuristic words-per-minute categorization
//
// Maps a transcribed word count and the recording length onto a pace
// category using fixed threshold rules:
//
// 1. wpm > 180 -> TooFast
// 2. wpm > 160 -> Fast
// 3. wpm < 100 -> TooSlow
// 4. wpm < 120 -> Slow
// 5. otherwise -> Good
//
// The 160-180 band intentionally falls through to Fast rather than getting
// a band of its own; the asymmetry against the 100-120 Slow band is part of
// the published behavior.

use serde::{Deserialize, Serialize};

use crate::config::PaceThresholds;

/// Categorical speaking-rate state
///
/// `Unclear` and `Error` carry upstream transcription failures through to
/// the dashboard; `Unknown` means speech was never analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceStatus {
    TooFast,
    Fast,
    Good,
    Slow,
    TooSlow,
    Unclear,
    Error,
    Unknown,
}

/// Pace classification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaceReport {
    pub status: PaceStatus,
    /// Words per minute, truncated to an integer
    pub wpm: u32,
    pub word_count: usize,
}

impl PaceReport {
    /// Speech was recorded but could not be understood
    pub fn unclear() -> Self {
        Self {
            status: PaceStatus::Unclear,
            wpm: 0,
            word_count: 0,
        }
    }

    /// The transcription service failed
    pub fn service_error() -> Self {
        Self {
            status: PaceStatus::Error,
            wpm: 0,
            word_count: 0,
        }
    }
}

/// Classifier applying the fixed words-per-minute rules
pub struct PaceClassifier {
    thresholds: PaceThresholds,
}

impl PaceClassifier {
    pub fn new(thresholds: PaceThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify a word count against a recording length in minutes
    ///
    /// A non-positive duration cannot produce a rate, so it is treated as
    /// `wpm = 0` instead of dividing by zero.
    pub fn classify(&self, word_count: usize, duration_minutes: f64) -> PaceReport {
        let wpm = if duration_minutes > 0.0 {
            word_count as f64 / duration_minutes
        } else {
            0.0
        };

        let status = if wpm > self.thresholds.too_fast_wpm {
            PaceStatus::TooFast
        } else if wpm > self.thresholds.fast_wpm {
            PaceStatus::Fast
        } else if wpm < self.thresholds.too_slow_wpm {
            PaceStatus::TooSlow
        } else if wpm < self.thresholds.slow_wpm {
            PaceStatus::Slow
        } else {
            PaceStatus::Good
        };

        PaceReport {
            status,
            wpm: wpm as u32,
            word_count,
        }
    }

    /// Classify a raw transcript by whitespace word count
    pub fn classify_transcript(&self, transcript: &str, duration_minutes: f64) -> PaceReport {
        self.classify(transcript.split_whitespace().count(), duration_minutes)
    }
}

impl Default for PaceClassifier {
    fn default() -> Self {
        Self::new(PaceThresholds::default())
    }
}
