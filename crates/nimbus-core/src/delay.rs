//! Fixed delay line with output taps.
//!
//! [`Delay`] is a [`RingBuffer`] read at a constant offset. Besides its main
//! output it offers [`tap`](Delay::tap): extra reads at other offsets and
//! gains that accumulate into a caller-owned sum. The hall builds both stereo
//! channels from taps on its mono tank lines this way, without storing the
//! signal twice.

use crate::allocator::SampleAllocator;
use crate::error::AllocError;
use crate::math::seconds_to_samples;
use crate::ring::RingBuffer;
use crate::stage::MonoStage;

/// Fixed-length delay line.
///
/// The buffer is sized for exactly `delay_seconds` (rounded up to a power of
/// two), so the maximum delay equals the nominal delay.
///
/// # Example
///
/// ```rust
/// use nimbus_core::{Delay, HeapAllocator, MonoStage};
///
/// let heap = HeapAllocator;
/// let mut delay = Delay::new(&heap, 1000.0, 0.003)?; // 3 samples
///
/// let out: Vec<f32> = [1.0, 2.0, 3.0, 4.0, 5.0]
///     .into_iter()
///     .map(|x| delay.process(x))
///     .collect();
/// assert_eq!(out, [0.0, 0.0, 0.0, 1.0, 2.0]);
/// # Ok::<(), nimbus_core::AllocError>(())
/// ```
#[derive(Debug)]
pub struct Delay<'a, A: SampleAllocator + ?Sized> {
    ring: RingBuffer<'a, A>,
}

impl<'a, A: SampleAllocator + ?Sized> Delay<'a, A> {
    /// Create a delay of `delay_seconds`.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the allocator cannot supply the buffer.
    pub fn new(allocator: &'a A, sample_rate: f32, delay_seconds: f32) -> Result<Self, AllocError> {
        Ok(Self {
            ring: RingBuffer::new(allocator, sample_rate, delay_seconds, delay_seconds)?,
        })
    }

    /// Add a delayed, scaled copy of the stored signal into `out`.
    ///
    /// Reads `buffer[(cursor - capacity - tap_samples) & mask]`, where
    /// `tap_samples` is `delay_seconds` truncated to whole samples. The
    /// `capacity` term vanishes under the mask, so `delay_seconds = 0` reads
    /// the oldest cell and larger values walk toward newer material.
    ///
    /// `out` is accumulated into, never cleared. Takes `&self`: repeated taps
    /// with the same arguments return the same value and leave the line
    /// untouched.
    #[inline]
    pub fn tap(&self, delay_seconds: f32, gain: f32, out: &mut f32) {
        let tap_samples = seconds_to_samples(self.ring.sample_rate(), delay_seconds);
        let position = self
            .ring
            .cursor()
            .wrapping_sub(self.ring.capacity())
            .wrapping_sub(tap_samples);
        *out += gain * self.ring.at(position);
    }

    /// Delay length in whole samples.
    pub fn delay_samples(&self) -> usize {
        self.ring.delay_samples()
    }

    /// Buffer capacity in samples.
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Index of the next write.
    pub fn cursor(&self) -> usize {
        self.ring.cursor()
    }
}

impl<A: SampleAllocator + ?Sized> MonoStage for Delay<'_, A> {
    /// `out = buffer[cursor - delay]`, then store `input` and advance.
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let out = self.ring.read(self.ring.delay_samples());
        self.ring.write_advance(input);
        out
    }
}
