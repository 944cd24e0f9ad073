//! DC blocking filter for the tank input.
//!
//! Uses a first-order highpass (Julius O. Smith's DC blocker):
//! `H(z) = (1 - z^-1) / (1 - R*z^-1)`.
//!
//! The hall sums its feedback scalar back into the input every sample; any
//! offset picked up on that path would otherwise recirculate forever. R is
//! fixed at 0.99 (about 76 Hz at 48 kHz) regardless of sample rate.
//!
//! Reference: Julius O. Smith, "Introduction to Digital Filters with Audio
//! Applications", Chapter on DC Blocker.

use crate::stage::MonoStage;

/// DC blocking filter using a first-order highpass.
///
/// ## Transfer Function
///
/// ```text
/// y[n] = x[n] - x[n-1] + R * y[n-1],    R = 0.99
/// ```
///
/// ## Example
///
/// ```rust
/// use nimbus_core::{DcBlocker, MonoStage};
///
/// let mut blocker = DcBlocker::new();
/// let mut out = 0.0;
/// for _ in 0..2000 {
///     out = blocker.process(0.25);
/// }
/// assert!(out.abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct DcBlocker {
    /// Previous input sample x[n-1]
    x_prev: f32,
    /// Previous output sample y[n-1]
    y_prev: f32,
}

impl DcBlocker {
    /// Pole position.
    pub const COEFF: f32 = 0.99;

    /// Create a DC blocker with cleared history.
    pub fn new() -> Self {
        Self {
            x_prev: 0.0,
            y_prev: 0.0,
        }
    }
}

impl Default for DcBlocker {
    fn default() -> Self {
        Self::new()
    }
}

impl MonoStage for DcBlocker {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = input - self.x_prev + Self::COEFF * self.y_prev;
        self.x_prev = input;
        self.y_prev = output;
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    #[test]
    fn test_dc_blocker_removes_dc() {
        let mut blocker = DcBlocker::new();

        let mut output = 0.0;
        for _ in 0..2000 {
            output = blocker.process(1.0);
        }

        assert!(output.abs() < 1e-4, "DC should be removed, got {}", output);
    }

    #[test]
    fn test_dc_blocker_passes_ac() {
        let mut blocker = DcBlocker::new();
        let freq = 1000.0;
        let sample_rate = 48000.0;

        for i in 0..4800 {
            let t = i as f32 / sample_rate;
            blocker.process(libm::sinf(2.0 * PI * freq * t));
        }

        let mut max_output = 0.0f32;
        for i in 0..48 {
            let t = (4800 + i) as f32 / sample_rate;
            let output = blocker.process(libm::sinf(2.0 * PI * freq * t));
            max_output = max_output.max(output.abs());
        }

        assert!(
            max_output > 0.95,
            "1 kHz should pass through, max output was {}",
            max_output
        );
    }

    #[test]
    fn test_dc_blocker_first_sample_passes() {
        let mut blocker = DcBlocker::new();
        assert_eq!(blocker.process(0.7), 0.7);
        assert!((blocker.process(0.7) - 0.693).abs() < 1e-6);
    }
}
