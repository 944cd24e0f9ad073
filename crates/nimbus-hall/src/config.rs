//! Construction-time settings for a hall unit.
//!
//! The topology itself (delay lengths, coefficients, taps) is fixed; see
//! [`topology`](crate::topology). [`HallConfig`] only carries what the host
//! negotiates plus the choice of fractional-read method.

use nimbus_core::Interpolation;

use crate::error::HallError;

/// Host-facing configuration for [`ReverbUnit`](crate::ReverbUnit).
///
/// # Example
///
/// ```rust
/// use nimbus_core::Interpolation;
/// use nimbus_hall::HallConfig;
///
/// let config = HallConfig::default()
///     .with_sample_rate(96000.0)
///     .with_interpolation(Interpolation::Cubic);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.buffer_size, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HallConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Host block size. Recorded for the host's benefit; the unit processes
    /// one sample per call and never reads it.
    pub buffer_size: usize,
    /// Fractional-read method for the two modulated allpasses.
    pub interpolation: Interpolation,
}

impl HallConfig {
    /// Default sample rate (48 kHz).
    pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;
    /// Default host block size.
    pub const DEFAULT_BUFFER_SIZE: usize = 256;

    /// Config for `sample_rate` with the remaining fields defaulted.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Set the sample rate.
    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the informational host block size.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Check that the unit can be built from this config.
    ///
    /// # Errors
    ///
    /// [`HallError::InvalidSampleRate`] unless the rate is positive and
    /// finite.
    pub fn validate(&self) -> Result<(), HallError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(HallError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }
}

impl Default for HallConfig {
    fn default() -> Self {
        Self {
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            buffer_size: Self::DEFAULT_BUFFER_SIZE,
            interpolation: Interpolation::Linear,
        }
    }
}
