//! Memory capability for delay-line storage.
//!
//! Delay lines never allocate on their own. They are handed a
//! [`SampleAllocator`] at construction, request one block from it,
//! and return that block when they are dropped. Nothing here is touched from
//! the per-sample path.
//!
//! # Implementations
//!
//! | Type | Source of memory | Exhaustion |
//! |------|------------------|------------|
//! | [`HeapAllocator`] | global heap, fallible reservation | `None` when the heap refuses |
//! | [`PoolAllocator`] | blocks reserved up front | `None` when no free block is large enough |

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::RefCell;

/// Supplies and reclaims sample storage for delay lines.
///
/// Implementations take `&self` because a single allocator is shared by every
/// delay line in a unit; pools use interior mutability for their free list.
///
/// # Contract
///
/// - `allocate(len)` returns a block of **at least** `len` samples, or `None`
///   when exhausted. It must not panic on exhaustion.
/// - `deallocate` receives every block exactly once, from the delay line that
///   owned it.
pub trait SampleAllocator {
    /// Request a block of at least `len` samples.
    fn allocate(&self, len: usize) -> Option<Box<[f32]>>;

    /// Return a block previously obtained from [`allocate`](Self::allocate).
    fn deallocate(&self, block: Box<[f32]>);
}

/// General-purpose heap allocator.
///
/// Uses `try_reserve_exact`, so an oversized request reports exhaustion
/// instead of aborting the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapAllocator;

impl SampleAllocator for HeapAllocator {
    fn allocate(&self, len: usize) -> Option<Box<[f32]>> {
        let mut block = Vec::new();
        block.try_reserve_exact(len).ok()?;
        block.resize(len, 0.0);
        Some(block.into_boxed_slice())
    }

    fn deallocate(&self, block: Box<[f32]>) {
        drop(block);
    }
}

/// Fixed pool of pre-allocated blocks.
///
/// All memory is reserved when the pool is built. `allocate` hands out the
/// smallest free block that fits; `deallocate` puts it back. The free list is
/// reserved for every block, so returning a block never grows it.
///
/// # Example
///
/// ```rust
/// use nimbus_core::{Delay, PoolAllocator};
///
/// let pool = PoolAllocator::with_blocks(&[1024, 1024]);
/// let delay = Delay::new(&pool, 48000.0, 0.01)?;
/// assert_eq!(pool.available(), 1);
/// drop(delay);
/// assert_eq!(pool.available(), 2);
/// # Ok::<(), nimbus_core::AllocError>(())
/// ```
#[derive(Debug)]
pub struct PoolAllocator {
    free: RefCell<Vec<Box<[f32]>>>,
}

impl PoolAllocator {
    /// Build a pool holding one zeroed block per entry of `sizes`.
    pub fn with_blocks(sizes: &[usize]) -> Self {
        let mut free = Vec::with_capacity(sizes.len());
        for &len in sizes {
            free.push(alloc::vec![0.0_f32; len].into_boxed_slice());
        }
        Self {
            free: RefCell::new(free),
        }
    }

    /// Number of blocks currently free.
    pub fn available(&self) -> usize {
        self.free.borrow().len()
    }

    /// Total samples held by free blocks.
    pub fn available_samples(&self) -> usize {
        self.free.borrow().iter().map(|b| b.len()).sum()
    }
}

impl SampleAllocator for PoolAllocator {
    fn allocate(&self, len: usize) -> Option<Box<[f32]>> {
        let mut free = self.free.borrow_mut();
        let index = free
            .iter()
            .enumerate()
            .filter(|(_, block)| block.len() >= len)
            .min_by_key(|(_, block)| block.len())
            .map(|(i, _)| i)?;
        Some(free.swap_remove(index))
    }

    fn deallocate(&self, block: Box<[f32]>) {
        self.free.borrow_mut().push(block);
    }
}
