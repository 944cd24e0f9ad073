//! Quadrature sine oscillator for delay modulation.
//!
//! [`SineLfo`] is a coupled-form ("magic circle") oscillator. Each step costs
//! two multiplies and two adds and yields a cosine and a sine together, which
//! gives the hall two modulation sources 90 degrees apart for one oscillator.
//!
//! ```text
//! cos -= k * sin
//! sin += k * cos        (uses the cos just updated)
//! k    = 2π f / fs
//! ```
//!
//! # Drift
//!
//! The recurrence is not exactly amplitude-preserving in floating point:
//! `cos² + sin²` wobbles by roughly `k/2` within each cycle and wanders
//! slowly over very long runs. At modulation rates this is inaudible, and the
//! state is deliberately never renormalized or reset.

/// Coupled-form quadrature LFO.
///
/// Starts at `(cos, sin) = (1, 0)`. Frequency is zero until
/// [`set_frequency`](Self::set_frequency) is called.
///
/// # Example
///
/// ```rust
/// use nimbus_core::SineLfo;
///
/// let mut lfo = SineLfo::new(48000.0);
/// lfo.set_frequency(0.5);
///
/// let (cosine, sine) = lfo.process();
/// assert!(cosine <= 1.0 && sine > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SineLfo {
    sample_rate: f32,
    k: f32,
    cosine: f32,
    sine: f32,
}

impl SineLfo {
    /// Create an oscillator for `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            k: 0.0,
            cosine: 1.0,
            sine: 0.0,
        }
    }

    /// Set frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.k = core::f32::consts::TAU * freq_hz / self.sample_rate;
    }

    /// Rotation coefficient `2π f / fs`.
    pub fn coefficient(&self) -> f32 {
        self.k
    }

    /// Advance one sample and return `(cosine, sine)`.
    #[inline]
    pub fn process(&mut self) -> (f32, f32) {
        self.cosine -= self.k * self.sine;
        self.sine += self.k * self.cosine;
        (self.cosine, self.sine)
    }

    /// Current `(cosine, sine)` without advancing.
    pub fn state(&self) -> (f32, f32) {
        (self.cosine, self.sine)
    }
}
