// FFT module - autocorrelation via the Wiener-Khinchin theorem
//
// Computes the autocorrelation of an audio frame by transforming to the
// frequency domain, taking the power spectrum, and transforming back. The
// frame is zero-padded to twice its length so the result is a linear, not
// circular, correlation.

use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::{Arc, Mutex};

/// Autocorrelation processor reusing FFT plans across frames
pub struct AutocorrProcessor {
    fft_planner: Arc<Mutex<FftPlanner<f32>>>,
    frame_size: usize,
    /// Transform length: next power of two above 2 * frame_size
    fft_size: usize,
}

impl AutocorrProcessor {
    /// Create a new autocorrelation processor
    ///
    /// # Arguments
    /// * `frame_size` - Analysis frame length in samples
    pub fn new(frame_size: usize) -> Self {
        let fft_size = (2 * frame_size.max(1)).next_power_of_two();
        Self {
            fft_planner: Arc::new(Mutex::new(FftPlanner::new())),
            frame_size,
            fft_size,
        }
    }

    /// Compute the normalized autocorrelation of a frame
    ///
    /// Returns lag values 0..frame_size scaled so that lag 0 equals 1.0.
    /// A frame with no energy returns an all-zero sequence.
    ///
    /// # Arguments
    /// * `frame` - Audio frame (length <= frame_size; shorter frames are
    ///   zero-padded)
    pub fn compute(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = Vec::with_capacity(self.fft_size);
        for &sample in frame.iter().take(self.frame_size) {
            buffer.push(Complex::new(sample, 0.0));
        }
        while buffer.len() < self.fft_size {
            buffer.push(Complex::new(0.0, 0.0));
        }

        let (forward, inverse) = {
            let mut planner = self.fft_planner.lock().unwrap();
            (
                planner.plan_fft_forward(self.fft_size),
                planner.plan_fft_inverse(self.fft_size),
            )
        };

        forward.process(&mut buffer);

        // Power spectrum: multiply by the complex conjugate
        for value in buffer.iter_mut() {
            *value = Complex::new(value.norm_sqr(), 0.0);
        }

        inverse.process(&mut buffer);

        let r0 = buffer[0].re;
        if r0 <= f32::EPSILON {
            return vec![0.0; self.frame_size];
        }

        buffer[..self.frame_size]
            .iter()
            .map(|c| c.re / r0)
            .collect()
    }
}
