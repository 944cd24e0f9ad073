//! One-pole tone filter for the tank halves.
//!
//! A two-tap FIR average with the difference equation:
//!
//! ```text
//! y[n] = (1 - k) * x[n] + k * x[n-1],    k = 0.3
//! ```
//!
//! Gain is 1 at DC and `1 - 2k = 0.4` at Nyquist, so each pass through the
//! tank darkens the tail a little more. `k` is not scaled with sample rate:
//! at 96 kHz the rolloff sits an octave higher than at 48 kHz.

use crate::stage::MonoStage;

/// Fixed-coefficient high-frequency shelf (cut).
///
/// # Invariants
///
/// - Coefficients sum to 1, so a constant input settles at the same value.
///
/// # Example
///
/// ```rust
/// use nimbus_core::{HiShelf, MonoStage};
///
/// let mut tone = HiShelf::new();
/// tone.process(1.0);
/// assert!((tone.process(1.0) - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HiShelf {
    x_prev: f32,
}

impl HiShelf {
    /// Weight of the previous input.
    pub const COEFF: f32 = 0.3;

    /// Create a tone filter with cleared history.
    pub fn new() -> Self {
        Self { x_prev: 0.0 }
    }
}

impl MonoStage for HiShelf {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = (1.0 - Self::COEFF) * input + Self::COEFF * self.x_prev;
        self.x_prev = input;
        output
    }
}
