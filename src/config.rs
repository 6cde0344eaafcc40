//! Configuration management for cycle cadence and classifier thresholds
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling cadence and threshold changes without recompilation. The
//! defaults reproduce the dashboard's reference behavior: a 10 second
//! student cycle, a 10 second speech recording, and the published
//! pace/tone thresholds.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub student: StudentCycleConfig,
    pub speech: SpeechCycleConfig,
    pub analysis: AnalysisConfig,
}

/// Continuous student-cycle cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCycleConfig {
    /// Delay before the first iteration, giving capture devices time to settle
    pub startup_delay_secs: u64,
    /// Idle time between iterations
    pub idle_interval_secs: u64,
    /// Ambient-audio observation window per iteration
    pub audio_sample_secs: u64,
    /// Emotion observation window per iteration
    pub emotion_window_secs: u64,
}

impl StudentCycleConfig {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_secs(self.idle_interval_secs)
    }

    pub fn audio_sample(&self) -> Duration {
        Duration::from_secs(self.audio_sample_secs)
    }
}

impl Default for StudentCycleConfig {
    fn default() -> Self {
        Self {
            startup_delay_secs: 5,
            idle_interval_secs: 10,
            audio_sample_secs: 3,
            emotion_window_secs: 5,
        }
    }
}

/// On-demand speech-cycle timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechCycleConfig {
    /// Countdown between accepting a trigger and starting the recording
    pub countdown_secs: u64,
    /// Recording length
    pub record_secs: u64,
    /// Capture sample rate in Hz
    pub sample_rate: u32,
}

impl SpeechCycleConfig {
    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_secs)
    }

    pub fn record_duration(&self) -> Duration {
        Duration::from_secs(self.record_secs)
    }
}

impl Default for SpeechCycleConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 2,
            record_secs: 10,
            sample_rate: 16_000,
        }
    }
}

/// Classifier thresholds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub pace: PaceThresholds,
    pub tone: ToneThresholds,
}

/// Words-per-minute boundaries for pace classification
///
/// Evaluated in order: above `too_fast_wpm`, above `fast_wpm`, below
/// `too_slow_wpm`, below `slow_wpm`, otherwise good. The 160-180 band
/// deliberately classifies as fast, not as a band of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaceThresholds {
    pub too_fast_wpm: f64,
    pub fast_wpm: f64,
    pub slow_wpm: f64,
    pub too_slow_wpm: f64,
}

impl Default for PaceThresholds {
    fn default() -> Self {
        Self {
            too_fast_wpm: 180.0,
            fast_wpm: 160.0,
            slow_wpm: 120.0,
            too_slow_wpm: 100.0,
        }
    }
}

/// Energy and pitch-variation boundaries for tone classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneThresholds {
    /// Mean RMS below this is too quiet
    pub too_quiet_energy: f32,
    /// Mean RMS below this is quiet
    pub quiet_energy: f32,
    /// Mean RMS above this is too loud
    pub loud_energy: f32,
    /// Normalized pitch deviation below this counts as monotone
    pub monotone_variation: f32,
}

impl Default for ToneThresholds {
    fn default() -> Self {
        Self {
            too_quiet_energy: 0.02,
            quiet_energy: 0.05,
            loud_energy: 0.15,
            monotone_variation: 0.1,
        }
    }
}

impl Default for AppConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            student: StudentCycleConfig::default(),
            speech: SpeechCycleConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or the defaults if the file is missing or
    /// the JSON is invalid (a warning is logged in either case).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    tracing::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file("assets/pulse_config.json")
    }
}
