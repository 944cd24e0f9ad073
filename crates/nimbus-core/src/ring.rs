//! Power-of-two circular buffer shared by every delay line.
//!
//! [`RingBuffer`] is the storage half of [`Delay`](crate::Delay),
//! [`Allpass`](crate::Allpass) and [`VariableAllpass`](crate::VariableAllpass).
//! It is embedded by value in each of them; the variants only differ in what
//! they compute from the cells they read.
//!
//! # Indexing
//!
//! Capacity is always a power of two, so wraparound is a bitwise AND with
//! `capacity - 1` instead of a modulo. The cursor is the index of the *next*
//! write. A read "`n` samples back" is `buffer[(cursor - n) & mask]`; with
//! `n == capacity` (or `0` after masking) it lands on the oldest cell, the one
//! about to be overwritten.
//!
//! ```text
//!            oldest          newest
//!              v               v
//!   [ . . . . c . . . . . . . c-1 . . . ]   c = cursor
//!              ^ write goes here next
//! ```
//!
//! # Ownership
//!
//! The block comes from a [`SampleAllocator`] at construction and goes back to
//! the same allocator when the ring is dropped. The allocator is borrowed for
//! `'a`, so it cannot be dropped while any ring still holds one of its blocks.

use alloc::boxed::Box;

use crate::allocator::SampleAllocator;
use crate::error::AllocError;
use crate::math::seconds_to_samples;

/// Capacity, in samples, of a ring that must hold `max_delay_seconds`.
///
/// The next power of two at or above `sample_rate * max_delay_seconds`
/// (truncated to whole samples). Never zero.
///
/// # Example
/// ```rust
/// use nimbus_core::capacity_for;
///
/// assert_eq!(capacity_for(48000.0, 3.5e-3), 256); // 168 samples
/// assert_eq!(capacity_for(48000.0, 0.1), 8192); // 4800 samples
/// ```
#[inline]
pub fn capacity_for(sample_rate: f32, max_delay_seconds: f32) -> usize {
    seconds_to_samples(sample_rate, max_delay_seconds).next_power_of_two()
}

/// Masked circular buffer with a single advancing write cursor.
///
/// Stores the nominal delay both in seconds (for modulated reads) and in
/// whole samples (for fixed reads).
#[derive(Debug)]
pub struct RingBuffer<'a, A: SampleAllocator + ?Sized> {
    storage: Box<[f32]>,
    mask: usize,
    cursor: usize,
    sample_rate: f32,
    delay_seconds: f32,
    delay_samples: usize,
    allocator: &'a A,
}

impl<'a, A: SampleAllocator + ?Sized> RingBuffer<'a, A> {
    /// Acquire and zero a buffer able to hold `max_delay_seconds`.
    ///
    /// # Arguments
    ///
    /// * `allocator` - Source of the block; borrowed until the ring is dropped
    /// * `sample_rate` - Sample rate in Hz
    /// * `max_delay_seconds` - Longest delay the ring must hold (sets capacity)
    /// * `delay_seconds` - Nominal delay (sets the default read offset)
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the allocator is exhausted or hands back a block
    /// shorter than the requested capacity. A short block is returned to the
    /// allocator before failing.
    pub fn new(
        allocator: &'a A,
        sample_rate: f32,
        max_delay_seconds: f32,
        delay_seconds: f32,
    ) -> Result<Self, AllocError> {
        let capacity = capacity_for(sample_rate, max_delay_seconds);
        let Some(mut storage) = allocator.allocate(capacity) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(capacity, "ring_alloc: allocator exhausted");
            return Err(AllocError {
                requested: capacity,
            });
        };
        if storage.len() < capacity {
            allocator.deallocate(storage);
            return Err(AllocError {
                requested: capacity,
            });
        }
        storage[..capacity].fill(0.0);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            capacity,
            max_delay_seconds,
            delay_seconds,
            "ring_alloc: delay line storage acquired"
        );

        Ok(Self {
            storage,
            mask: capacity - 1,
            cursor: 0,
            sample_rate,
            delay_seconds,
            delay_samples: seconds_to_samples(sample_rate, delay_seconds),
            allocator,
        })
    }

    /// Cell `back` samples behind the cursor (masked).
    #[inline]
    pub fn read(&self, back: usize) -> f32 {
        self.storage[self.cursor.wrapping_sub(back) & self.mask]
    }

    /// Cell at an absolute, unmasked index. Negative positions arrive here
    /// already wrapped to `usize`; masking makes them land correctly.
    #[inline]
    pub fn at(&self, index: usize) -> f32 {
        self.storage[index & self.mask]
    }

    /// Store `sample` at the cursor and advance it by one.
    #[inline]
    pub fn write_advance(&mut self, sample: f32) {
        self.storage[self.cursor] = sample;
        self.cursor = (self.cursor + 1) & self.mask;
    }

    /// Index of the next write.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of cells in use (a power of two).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// `capacity - 1`.
    #[inline]
    pub fn mask(&self) -> usize {
        self.mask
    }

    /// Sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Nominal delay in seconds.
    #[inline]
    pub fn delay_seconds(&self) -> f32 {
        self.delay_seconds
    }

    /// Nominal delay in whole samples (truncated).
    #[inline]
    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }
}

impl<A: SampleAllocator + ?Sized> Drop for RingBuffer<'_, A> {
    fn drop(&mut self) {
        let storage = core::mem::take(&mut self.storage);
        #[cfg(feature = "tracing")]
        tracing::trace!(capacity = self.mask + 1, "ring_free: storage returned");
        self.allocator.deallocate(storage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HeapAllocator, PoolAllocator};

    #[test]
    fn capacity_rounds_up_to_power_of_two() {
        assert_eq!(capacity_for(48000.0, 6.3e-3), 512);
        assert_eq!(capacity_for(48000.0, 180.3e-3), 16384);
        assert_eq!(capacity_for(1000.0, 0.064), 64);
        assert_eq!(capacity_for(48000.0, 0.0), 1);
    }

    #[test]
    fn stores_delay_in_both_units() {
        let heap = HeapAllocator;
        let ring = RingBuffer::new(&heap, 48000.0, 0.1, 25.6e-3).unwrap();
        assert_eq!(ring.capacity(), 8192);
        assert_eq!(ring.mask(), 8191);
        assert_eq!(ring.delay_samples(), 1228);
        assert!((ring.delay_seconds() - 25.6e-3).abs() < 1e-9);
    }

    #[test]
    fn cursor_wraps_with_mask() {
        let heap = HeapAllocator;
        let mut ring = RingBuffer::new(&heap, 1000.0, 0.004, 0.002).unwrap();
        assert_eq!(ring.capacity(), 4);
        for i in 0..6 {
            ring.write_advance(i as f32);
        }
        assert_eq!(ring.cursor(), 2);
        // Newest is 5.0, one behind the cursor.
        assert_eq!(ring.read(1), 5.0);
        assert_eq!(ring.read(4), 2.0);
        assert_eq!(ring.read(0), 2.0);
    }

    #[test]
    fn negative_positions_wrap() {
        let heap = HeapAllocator;
        let mut ring = RingBuffer::new(&heap, 1000.0, 0.008, 0.001).unwrap();
        for i in 0..8 {
            ring.write_advance(i as f32);
        }
        let minus_one = -1_isize as usize;
        assert_eq!(ring.at(minus_one), 7.0);
    }

    #[test]
    fn reused_pool_block_is_zeroed() {
        let pool = PoolAllocator::with_blocks(&[16]);
        {
            let mut ring = RingBuffer::new(&pool, 1000.0, 0.016, 0.004).unwrap();
            for _ in 0..16 {
                ring.write_advance(1.0);
            }
        }
        let ring = RingBuffer::new(&pool, 1000.0, 0.016, 0.004).unwrap();
        assert!((0..16).all(|back| ring.read(back) == 0.0));
    }

    #[test]
    fn short_block_is_rejected_and_returned() {
        use core::cell::Cell;

        /// Hands out blocks half the requested size.
        #[derive(Debug)]
        struct Stingy {
            returned: Cell<usize>,
        }

        impl SampleAllocator for Stingy {
            fn allocate(&self, len: usize) -> Option<Box<[f32]>> {
                Some(alloc::vec![0.0; len / 2].into_boxed_slice())
            }

            fn deallocate(&self, _block: Box<[f32]>) {
                self.returned.set(self.returned.get() + 1);
            }
        }

        let stingy = Stingy {
            returned: Cell::new(0),
        };
        let err = RingBuffer::new(&stingy, 1000.0, 0.016, 0.004).unwrap_err();
        assert_eq!(err.requested, 16);
        assert_eq!(stingy.returned.get(), 1);
    }
}
