// Pitch module - autocorrelation fundamental-frequency tracking
//
// Estimates one pitch value per analysis frame by locating the dominant
// autocorrelation peak inside the speaking range. Frames that fail the
// energy gate or whose peak is too weak count as unvoiced and produce no
// value, so the returned profile contains voiced frames only.

use super::energy::rms;
use super::fft::AutocorrProcessor;

/// Lowest trackable fundamental in Hz
pub const MIN_PITCH_HZ: f32 = 50.0;

/// Highest trackable fundamental in Hz
pub const MAX_PITCH_HZ: f32 = 500.0;

/// Normalized autocorrelation a peak must reach to count as voiced
const CLARITY_THRESHOLD: f32 = 0.5;

/// RMS below which a frame is silence, not speech
const VOICING_RMS_FLOOR: f32 = 1e-3;

/// Frame-wise pitch tracker
pub struct PitchTracker {
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    processor: AutocorrProcessor,
}

impl PitchTracker {
    pub fn new(sample_rate: u32, frame_size: usize, hop_size: usize) -> Self {
        Self {
            sample_rate,
            frame_size,
            hop_size,
            processor: AutocorrProcessor::new(frame_size),
        }
    }

    /// Pitch estimates for the voiced frames of a clip
    pub fn track(&self, samples: &[f32]) -> Vec<f32> {
        if samples.len() < self.frame_size || self.hop_size == 0 {
            return Vec::new();
        }

        let Some((min_lag, max_lag)) = self.lag_range() else {
            return Vec::new();
        };

        let mut pitches = Vec::new();
        let mut start = 0;
        while start + self.frame_size <= samples.len() {
            let frame = &samples[start..start + self.frame_size];
            if let Some(pitch) = self.track_frame(frame, min_lag, max_lag) {
                pitches.push(pitch);
            }
            start += self.hop_size;
        }
        pitches
    }

    /// Lag search bounds for the speaking range, None when the sample rate
    /// is too low to resolve it
    fn lag_range(&self) -> Option<(usize, usize)> {
        let min_lag = ((self.sample_rate as f32 / MAX_PITCH_HZ) as usize).max(2);
        let max_lag = ((self.sample_rate as f32 / MIN_PITCH_HZ).ceil() as usize)
            .min(self.frame_size - 1);
        if min_lag >= max_lag {
            return None;
        }
        Some((min_lag, max_lag))
    }

    fn track_frame(&self, frame: &[f32], min_lag: usize, max_lag: usize) -> Option<f32> {
        if rms(frame) < VOICING_RMS_FLOOR {
            return None;
        }

        let autocorr = self.processor.compute(frame);

        let mut best_lag = 0;
        let mut best_value = 0.0f32;
        for (lag, &value) in autocorr
            .iter()
            .enumerate()
            .take(max_lag + 1)
            .skip(min_lag)
        {
            if value > best_value {
                best_value = value;
                best_lag = lag;
            }
        }

        if best_lag == 0 || best_value < CLARITY_THRESHOLD {
            return None;
        }

        Some(self.sample_rate as f32 / best_lag as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::{mean, FRAME_SIZE, HOP_SIZE};

    fn sine(freq: f32, secs: f32, rate: u32, amplitude: f32) -> Vec<f32> {
        let count = (secs * rate as f32) as usize;
        (0..count)
            .map(|i| {
                amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn tracks_a_pure_tone() {
        let tracker = PitchTracker::new(16_000, FRAME_SIZE, HOP_SIZE);
        let samples = sine(220.0, 0.5, 16_000, 0.3);
        let pitches = tracker.track(&samples);

        assert!(!pitches.is_empty());
        assert!((mean(&pitches) - 220.0).abs() < 5.0);
    }

    #[test]
    fn silence_has_no_voiced_frames() {
        let tracker = PitchTracker::new(16_000, FRAME_SIZE, HOP_SIZE);
        assert!(tracker.track(&vec![0.0; 16_000]).is_empty());
    }

    #[test]
    fn noise_has_no_voiced_frames() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let samples: Vec<f32> = (0..16_000).map(|_| rng.gen_range(-0.1..0.1)).collect();
        let tracker = PitchTracker::new(16_000, FRAME_SIZE, HOP_SIZE);
        assert!(tracker.track(&samples).is_empty());
    }

    #[test]
    fn short_clip_yields_no_frames() {
        let tracker = PitchTracker::new(16_000, FRAME_SIZE, HOP_SIZE);
        assert!(tracker.track(&[0.1; 100]).is_empty());
    }

    #[test]
    fn degenerate_sample_rate_yields_no_frames() {
        let tracker = PitchTracker::new(100, FRAME_SIZE, HOP_SIZE);
        let samples = sine(30.0, 30.0, 100, 0.3);
        assert!(tracker.track(&samples).is_empty());
    }
}
