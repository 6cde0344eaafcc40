// Tone classifier - loudness and pitch-variation categorization
//
// Works on two feature sequences extracted from the recorded clip: short
// window RMS energies and voiced fundamental-frequency samples. Energy
// classifies mean loudness into too_quiet/quiet/good/too_loud; normalized
// pitch deviation (stddev / mean) below 0.1 marks the delivery monotone.
//
// This is a total function over its inputs: empty sequences classify too,
// and the `unknown()` constructor is the fallback the pipeline commits when
// feature extraction itself fails.

use serde::{Deserialize, Serialize};

use crate::analysis::features::{mean, std_dev};
use crate::config::ToneThresholds;

/// Guard against division by zero for silent pitch tracks
const PITCH_EPSILON: f32 = 1e-6;

/// Categorical delivery-tone state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneStatus {
    Monotone,
    Engaging,
    Unknown,
}

/// Categorical loudness state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyStatus {
    TooQuiet,
    Quiet,
    Good,
    TooLoud,
    Unknown,
}

/// Tone classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneReport {
    pub status: ToneStatus,
    /// Mean RMS energy over the clip
    pub energy: f32,
    pub energy_status: EnergyStatus,
    /// Normalized pitch deviation (stddev / mean of voiced frames)
    pub pitch_variation: f32,
    pub monotone: bool,
}

impl ToneReport {
    /// Fallback for failed feature extraction: zeroed numerics, unknown
    /// categories
    pub fn unknown() -> Self {
        Self {
            status: ToneStatus::Unknown,
            energy: 0.0,
            energy_status: EnergyStatus::Unknown,
            pitch_variation: 0.0,
            monotone: false,
        }
    }
}

/// Classifier applying the fixed energy and pitch-variation rules
pub struct ToneClassifier {
    thresholds: ToneThresholds,
}

impl ToneClassifier {
    pub fn new(thresholds: ToneThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify RMS energies and voiced pitch samples
    ///
    /// `pitch` must contain voiced frames only; silence frames are excluded
    /// upstream by the extractor. No voiced frames at all yields a pitch
    /// variation of zero, which classifies as monotone.
    pub fn classify(&self, rms: &[f32], pitch: &[f32]) -> ToneReport {
        let energy = mean(rms);

        let energy_status = if energy < self.thresholds.too_quiet_energy {
            EnergyStatus::TooQuiet
        } else if energy < self.thresholds.quiet_energy {
            EnergyStatus::Quiet
        } else if energy > self.thresholds.loud_energy {
            EnergyStatus::TooLoud
        } else {
            EnergyStatus::Good
        };

        let pitch_variation = if pitch.is_empty() {
            0.0
        } else {
            std_dev(pitch) / (mean(pitch) + PITCH_EPSILON)
        };

        let monotone = pitch_variation < self.thresholds.monotone_variation;
        let status = if monotone {
            ToneStatus::Monotone
        } else {
            ToneStatus::Engaging
        };

        ToneReport {
            status,
            energy,
            energy_status,
            pitch_variation,
            monotone,
        }
    }
}

impl Default for ToneClassifier {
    fn default() -> Self {
        Self::new(ToneThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_energy(energy: f32) -> EnergyStatus {
        ToneClassifier::default().classify(&[energy], &[]).energy_status
    }

    #[test]
    fn energy_boundaries() {
        assert_eq!(classify_energy(0.01), EnergyStatus::TooQuiet);
        assert_eq!(classify_energy(0.03), EnergyStatus::Quiet);
        assert_eq!(classify_energy(0.10), EnergyStatus::Good);
        assert_eq!(classify_energy(0.20), EnergyStatus::TooLoud);
    }

    #[test]
    fn no_voiced_frames_is_monotone() {
        let report = ToneClassifier::default().classify(&[0.1], &[]);
        assert_eq!(report.pitch_variation, 0.0);
        assert!(report.monotone);
        assert_eq!(report.status, ToneStatus::Monotone);
    }

    #[test]
    fn flat_pitch_is_monotone_varied_pitch_is_engaging() {
        let classifier = ToneClassifier::default();

        // mean 200 Hz, stddev 10 Hz -> variation 0.05
        let flat: Vec<f32> = [190.0, 210.0].repeat(50);
        let report = classifier.classify(&[0.03], &flat);
        assert!((report.pitch_variation - 0.05).abs() < 1e-3);
        assert!(report.monotone);
        assert_eq!(report.energy_status, EnergyStatus::Quiet);

        // mean 200 Hz, stddev 50 Hz -> variation 0.25
        let varied: Vec<f32> = [150.0, 250.0].repeat(50);
        let report = classifier.classify(&[0.1], &varied);
        assert!(report.pitch_variation > 0.2);
        assert!(!report.monotone);
        assert_eq!(report.status, ToneStatus::Engaging);
    }

    #[test]
    fn classification_is_idempotent() {
        let classifier = ToneClassifier::default();
        let rms = vec![0.04, 0.05, 0.06];
        let pitch = vec![180.0, 220.0, 200.0];
        let first = classifier.classify(&rms, &pitch);
        let second = classifier.classify(&rms, &pitch);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_inputs_still_classify() {
        let report = ToneClassifier::default().classify(&[], &[]);
        assert_eq!(report.energy, 0.0);
        assert_eq!(report.energy_status, EnergyStatus::TooQuiet);
        assert!(report.monotone);
    }

    #[test]
    fn unknown_report_zeroes_numerics() {
        let report = ToneReport::unknown();
        assert_eq!(report.status, ToneStatus::Unknown);
        assert_eq!(report.energy_status, EnergyStatus::Unknown);
        assert_eq!(report.energy, 0.0);
        assert_eq!(report.pitch_variation, 0.0);
        assert!(!report.monotone);
    }
}
