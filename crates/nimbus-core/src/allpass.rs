//! Schroeder allpass filters for reverb diffusion.
//!
//! Two variants share one ring buffer type and one difference equation:
//!
//! ```text
//! d    = buffer[cursor - delay]
//! w    = x + k * d          (written at the cursor)
//! y    = -k * w + d
//! ```
//!
//! - [`Allpass`] reads `d` at a fixed whole-sample offset.
//! - [`VariableAllpass`] reads `d` at a fractional, per-call offset (usually an
//!   LFO) and interpolates between neighbouring cells. Slowly moving the read
//!   point smears the tank's resonances and keeps the tail from ringing.
//!
//! Both read `d` and the input before writing anything, so they are safe to
//! run in place.

use crate::allocator::SampleAllocator;
use crate::error::AllocError;
use crate::math::Interpolation;
use crate::ring::RingBuffer;
use crate::stage::MonoStage;

/// Write `w = input + k * delayed`, advance, and return `-k * w + delayed`.
#[inline]
fn schroeder<A: SampleAllocator + ?Sized>(
    ring: &mut RingBuffer<'_, A>,
    input: f32,
    delayed: f32,
    k: f32,
) -> f32 {
    let feedback_plus_input = input + delayed * k;
    ring.write_advance(feedback_plus_input);
    feedback_plus_input * -k + delayed
}

/// Fixed Schroeder allpass.
///
/// Unity gain at every frequency for `|k| < 1`; only phase is altered. The
/// sign of `k` flips which frequencies lead and lag, which the hall uses to
/// decorrelate its two tank halves.
///
/// # Example
///
/// ```rust
/// use nimbus_core::{Allpass, HeapAllocator, MonoStage};
///
/// let heap = HeapAllocator;
/// let mut allpass = Allpass::new(&heap, 48000.0, 8.5e-3, 0.814)?;
///
/// // The direct path is -k * input.
/// assert!((allpass.process(1.0) + 0.814).abs() < 1e-6);
/// # Ok::<(), nimbus_core::AllocError>(())
/// ```
#[derive(Debug)]
pub struct Allpass<'a, A: SampleAllocator + ?Sized> {
    ring: RingBuffer<'a, A>,
    k: f32,
}

impl<'a, A: SampleAllocator + ?Sized> Allpass<'a, A> {
    /// Create an allpass with a `delay_seconds` loop and coefficient `k`.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the allocator cannot supply the buffer.
    pub fn new(
        allocator: &'a A,
        sample_rate: f32,
        delay_seconds: f32,
        k: f32,
    ) -> Result<Self, AllocError> {
        Ok(Self {
            ring: RingBuffer::new(allocator, sample_rate, delay_seconds, delay_seconds)?,
            k,
        })
    }

    /// Feedback/feedforward coefficient.
    pub fn coefficient(&self) -> f32 {
        self.k
    }

    /// Loop delay in whole samples.
    pub fn delay_samples(&self) -> usize {
        self.ring.delay_samples()
    }

    /// Buffer capacity in samples.
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }
}

impl<A: SampleAllocator + ?Sized> MonoStage for Allpass<'_, A> {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.ring.read(self.ring.delay_samples());
        schroeder(&mut self.ring, input, delayed, self.k)
    }
}

/// Schroeder allpass with a modulated, interpolated read position.
///
/// The read point for each call is
/// `cursor - (delay_seconds + offset) * sample_rate`. The four cells around
/// its integer floor (`y0` one older, `y1` at the floor, `y2` and `y3` newer)
/// feed the configured [`Interpolation`]. At `offset = 0` with a delay that is
/// a whole number of samples the read lands exactly on `y1`, and the output is
/// bit-identical to an [`Allpass`] with the same delay and coefficient.
///
/// The buffer is sized from `max_delay_seconds`, which must cover
/// `delay_seconds` plus the largest offset the caller will pass.
///
/// # Example
///
/// ```rust
/// use nimbus_core::{HeapAllocator, SineLfo, VariableAllpass};
///
/// let heap = HeapAllocator;
/// let mut lfo = SineLfo::new(48000.0);
/// lfo.set_frequency(0.5);
/// let mut allpass = VariableAllpass::new(&heap, 48000.0, 100e-3, 25.6e-3, 0.55)?;
///
/// let (cosine, _) = lfo.process();
/// let out = allpass.process(1.0, cosine * 0.32e-3);
/// assert!(out.is_finite());
/// # Ok::<(), nimbus_core::AllocError>(())
/// ```
#[derive(Debug)]
pub struct VariableAllpass<'a, A: SampleAllocator + ?Sized> {
    ring: RingBuffer<'a, A>,
    k: f32,
    interpolation: Interpolation,
}

impl<'a, A: SampleAllocator + ?Sized> VariableAllpass<'a, A> {
    /// Create a modulated allpass.
    ///
    /// # Arguments
    ///
    /// * `allocator` - Source of the delay buffer
    /// * `sample_rate` - Sample rate in Hz
    /// * `max_delay_seconds` - Buffer headroom; nominal delay plus peak offset
    /// * `delay_seconds` - Nominal (unmodulated) loop delay
    /// * `k` - Feedback/feedforward coefficient
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the allocator cannot supply the buffer.
    pub fn new(
        allocator: &'a A,
        sample_rate: f32,
        max_delay_seconds: f32,
        delay_seconds: f32,
        k: f32,
    ) -> Result<Self, AllocError> {
        Ok(Self {
            ring: RingBuffer::new(allocator, sample_rate, max_delay_seconds, delay_seconds)?,
            k,
            interpolation: Interpolation::Linear,
        })
    }

    /// Choose how fractional reads are computed.
    ///
    /// [`Interpolation::Linear`] (the default) keeps the historical hall
    /// voicing; [`Interpolation::Cubic`] is smoother under modulation.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    /// Current interpolation method.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Feedback/feedforward coefficient.
    pub fn coefficient(&self) -> f32 {
        self.k
    }

    /// Buffer capacity in samples.
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Process one sample with the read point shifted by `offset` seconds.
    ///
    /// Positive offsets lengthen the delay. The caller keeps
    /// `delay_seconds + offset` inside the buffer headroom; this is only
    /// checked in debug builds.
    #[inline]
    pub fn process(&mut self, input: f32, offset: f32) -> f32 {
        let ring = &self.ring;
        let delay_in_samples = (ring.delay_seconds() + offset) * ring.sample_rate();
        debug_assert!(
            delay_in_samples >= 0.0 && delay_in_samples < (ring.capacity() - 1) as f32,
            "modulated delay {delay_in_samples} outside buffer headroom {}",
            ring.capacity()
        );

        let position = ring.cursor() as f32 - delay_in_samples;
        let floor = libm::floorf(position);
        let frac = position - floor;
        let index = floor as isize as usize;

        let y0 = ring.at(index.wrapping_sub(1));
        let y1 = ring.at(index);
        let y2 = ring.at(index.wrapping_add(1));
        let y3 = ring.at(index.wrapping_add(2));
        let delayed = self.interpolation.evaluate(frac, y0, y1, y2, y3);

        schroeder(&mut self.ring, input, delayed, self.k)
    }

    /// In-place form of [`process`](Self::process).
    #[inline]
    pub fn process_in_place(&mut self, sample: &mut f32, offset: f32) {
        *sample = self.process(*sample, offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeapAllocator;

    #[test]
    fn impulse_response_shape() {
        let heap = HeapAllocator;
        let mut allpass = Allpass::new(&heap, 1000.0, 0.004, 0.5).unwrap();

        // Direct path.
        assert!((allpass.process(1.0) + 0.5).abs() < 1e-7);
        for _ in 0..3 {
            assert_eq!(allpass.process(0.0), 0.0);
        }
        // First echo: (1 - k^2) * 1.
        assert!((allpass.process(0.0) - 0.75).abs() < 1e-7);
    }

    #[test]
    fn negative_coefficient_is_stable() {
        let heap = HeapAllocator;
        let mut allpass = Allpass::new(&heap, 48000.0, 65.6e-3, -0.63).unwrap();
        let mut peak = 0.0_f32;
        for i in 0..48000 {
            let x = if i == 0 { 1.0 } else { 0.0 };
            peak = peak.max(allpass.process(x).abs());
        }
        assert!(peak <= 1.0);
    }

    #[test]
    fn zero_offset_matches_fixed() {
        let heap = HeapAllocator;
        // 1/64 s at 48 kHz is exactly 750 samples.
        let mut fixed = Allpass::new(&heap, 48000.0, 0.015625, 0.55).unwrap();
        let mut variable = VariableAllpass::new(&heap, 48000.0, 0.05, 0.015625, 0.55).unwrap();

        for i in 0..4000 {
            let x = libm::sinf(i as f32 * 0.05) * if i % 7 == 0 { 1.0 } else { 0.3 };
            assert_eq!(fixed.process(x), variable.process(x, 0.0), "diverged at {i}");
        }
    }

    #[test]
    fn fractional_offset_interpolates_between_cells() {
        let heap = HeapAllocator;
        // k = 0 turns the allpass into a pure (fractional) delay.
        let mut allpass = VariableAllpass::new(&heap, 1000.0, 0.016, 0.004, 0.0).unwrap();
        for x in [0.0, 10.0, 20.0, 30.0, 40.0, 50.0] {
            allpass.process(x, 0.0);
        }
        // Newest = 50 (1 back). Delay 4.5 samples sits between 10 and 20.
        let out = allpass.process(0.0, 0.0005);
        assert!((out - 15.0).abs() < 1e-4, "got {out}");
    }

    #[test]
    fn cubic_mode_stays_bounded() {
        let heap = HeapAllocator;
        let mut allpass = VariableAllpass::new(&heap, 48000.0, 100e-3, 40.7e-3, 0.55).unwrap();
        allpass.set_interpolation(Interpolation::Cubic);
        assert_eq!(allpass.interpolation(), Interpolation::Cubic);

        for i in 0..20000 {
            let offset = libm::sinf(i as f32 * 1e-3) * 0.45e-3;
            let x = if i == 0 { 1.0 } else { 0.0 };
            let y = allpass.process(x, offset);
            assert!(y.is_finite() && y.abs() < 2.0);
        }
    }
}
