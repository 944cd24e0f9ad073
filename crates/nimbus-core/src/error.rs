//! Construction-time error type.
//!
//! Processing never fails: once a delay line exists, every per-sample call is
//! unconditional arithmetic. The only fallible step is acquiring storage.

use thiserror::Error;

/// The allocator could not supply a delay buffer.
///
/// Returned by every delay-line constructor. Nothing is retried; the caller
/// decides whether to ask for shorter maximum delays or give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("allocator could not supply a block of {requested} samples")]
pub struct AllocError {
    /// Number of samples that were requested (always a power of two).
    pub requested: usize,
}
