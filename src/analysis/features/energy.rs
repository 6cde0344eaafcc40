// Energy module - windowed RMS loudness profile
//
// Computes the short-window RMS sequence the tone classifier averages into
// a single loudness figure. Frames shorter than the window at the clip
// tail are dropped; a clip shorter than one window yields a single frame
// over whatever samples exist.

/// RMS of one window
pub fn rms(window: &[f32]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = window.iter().map(|&x| x * x).sum();
    (sum_squares / window.len() as f32).sqrt()
}

/// Windowed RMS profile over a clip
///
/// # Arguments
/// * `samples` - Mono audio signal
/// * `frame_size` - Window length in samples
/// * `hop_size` - Advance between windows in samples
pub fn energy_profile(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<f32> {
    if samples.is_empty() || frame_size == 0 || hop_size == 0 {
        return Vec::new();
    }

    if samples.len() < frame_size {
        return vec![rms(samples)];
    }

    let mut profile = Vec::with_capacity(samples.len() / hop_size + 1);
    let mut start = 0;
    while start + frame_size <= samples.len() {
        profile.push(rms(&samples[start..start + frame_size]));
        start += hop_size;
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_constant_signal() {
        let window = vec![0.5; 128];
        assert!((rms(&window) - 0.5).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn rms_of_sine() {
        // RMS of a sine with amplitude A is A / sqrt(2)
        let window: Vec<f32> = (0..1024)
            .map(|i| 0.1 * (2.0 * std::f32::consts::PI * i as f32 / 64.0).sin())
            .collect();
        assert!((rms(&window) - 0.1 / 2.0_f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn profile_frame_count() {
        let samples = vec![0.25; 2048 + 512 * 3];
        let profile = energy_profile(&samples, 2048, 512);
        assert_eq!(profile.len(), 4);
        assert!(profile.iter().all(|&e| (e - 0.25).abs() < 1e-6));
    }

    #[test]
    fn short_clip_yields_single_frame() {
        let samples = vec![0.5; 100];
        let profile = energy_profile(&samples, 2048, 512);
        assert_eq!(profile.len(), 1);
        assert!((profile[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_clip_yields_empty_profile() {
        assert!(energy_profile(&[], 2048, 512).is_empty());
    }
}
