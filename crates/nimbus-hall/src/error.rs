//! Error types for hall construction.

use nimbus_core::AllocError;
use thiserror::Error;

/// Why a [`ReverbUnit`](crate::ReverbUnit) could not be built.
///
/// Processing never fails; every variant is raised by construction or
/// config validation. When construction fails, the delay lines built before
/// the failing one have already returned their storage to the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HallError {
    /// Sample rate is zero, negative, or not finite.
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    /// The allocator could not supply storage for a delay line.
    #[error("failed to allocate delay line '{line}': {source}")]
    AllocationFailed {
        /// Name of the delay line being built (e.g. `"tank_b.delay_2"`).
        line: &'static str,
        /// Underlying allocator failure.
        #[source]
        source: AllocError,
    },
}

impl HallError {
    /// Attach a delay-line name to an allocator failure.
    pub(crate) fn allocation(line: &'static str) -> impl FnOnce(AllocError) -> Self {
        move |source| Self::AllocationFailed { line, source }
    }
}
