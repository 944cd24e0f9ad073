//! Single-input processing stage trait.
//!
//! [`MonoStage`] is implemented by every primitive that maps one input sample
//! to one output sample: [`Delay`](crate::Delay), [`Allpass`](crate::Allpass),
//! [`DcBlocker`](crate::DcBlocker) and [`HiShelf`](crate::HiShelf).
//! [`VariableAllpass`](crate::VariableAllpass) takes a second (modulation)
//! input and provides the same pair of methods inherently.
//!
//! ## Design Decisions
//!
//! - **Unbuffered**: one call consumes exactly one sample. There is no block
//!   method; hosts that work in blocks loop over samples themselves.
//!
//! - **In-place tolerant**: every implementation reads its input and any
//!   state it needs before writing output or state, so
//!   [`process_in_place`](MonoStage::process_in_place) on shared storage gives
//!   the same result as [`process`](MonoStage::process) into separate storage.
//!
//! - **Static dispatch**: the hall wires concrete stage types at fixed call
//!   sites. The trait exists for uniform in-place chaining and generic tests,
//!   not for `dyn` routing.

/// A stage that consumes one sample and produces one sample.
///
/// # Example
///
/// ```rust
/// use nimbus_core::{DcBlocker, HiShelf, MonoStage};
///
/// let mut blocker = DcBlocker::new();
/// let mut tone = HiShelf::new();
///
/// let mut sound = 0.5;
/// blocker.process_in_place(&mut sound);
/// tone.process_in_place(&mut sound);
/// ```
pub trait MonoStage {
    /// Process a single sample.
    ///
    /// Advances internal state (filter history, delay cursor) by one sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a single sample whose input and output share storage.
    #[inline]
    fn process_in_place(&mut self, sample: &mut f32) {
        *sample = self.process(*sample);
    }
}
