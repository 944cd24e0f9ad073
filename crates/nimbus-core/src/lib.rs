//! Nimbus Core - delay-line and filter primitives for the nimbus hall reverb
//!
//! This crate provides the building blocks of a Schroeder/plate-style feedback
//! delay network, designed for sample-by-sample real-time processing with zero
//! allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Memory
//!
//! - [`SampleAllocator`] - Capability that supplies and reclaims delay storage
//! - [`HeapAllocator`] - Fallible general-heap implementation
//! - [`PoolAllocator`] - Pre-filled block pool for real-time-safe construction
//! - [`RingBuffer`] - Power-of-two circular buffer shared by every delay line
//!
//! ## Delay Lines
//!
//! - [`Delay`] - Fixed delay with side-effect-free output taps
//! - [`Allpass`] - Fixed Schroeder allpass
//! - [`VariableAllpass`] - Schroeder allpass with a modulated, interpolated read
//!
//! ## Filters & Modulation
//!
//! - [`DcBlocker`] - One-pole highpass for offset removal
//! - [`HiShelf`] - One-pole tone filter
//! - [`SineLfo`] - Coupled-form quadrature oscillator
//!
//! All single-input stages implement [`MonoStage`], which also provides
//! in-place processing for callers that share input and output storage.
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible (it needs `alloc` for boxed sample
//! blocks). Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! nimbus-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use nimbus_core::{Allpass, HeapAllocator, MonoStage};
//!
//! let heap = HeapAllocator;
//! let mut diffuser = Allpass::new(&heap, 48000.0, 5.0e-3, 0.6)?;
//!
//! let mut sample = 1.0;
//! diffuser.process_in_place(&mut sample);
//! # Ok::<(), nimbus_core::AllocError>(())
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: memory is requested only while building a delay line
//! - **Owned storage**: every delay line hands its block back on drop
//! - **Static dispatch**: stages are concrete types wired at known call sites

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod allocator;
pub mod allpass;
pub mod dc_blocker;
pub mod delay;
pub mod error;
pub mod hi_shelf;
pub mod lfo;
pub mod math;
pub mod ring;
pub mod stage;

// Re-export main types at crate root
pub use allocator::{HeapAllocator, PoolAllocator, SampleAllocator};
pub use allpass::{Allpass, VariableAllpass};
pub use dc_blocker::DcBlocker;
pub use delay::Delay;
pub use error::AllocError;
pub use hi_shelf::HiShelf;
pub use lfo::SineLfo;
pub use math::{Interpolation, flush_denormal, interpolate_cubic, interpolate_linear, seconds_to_samples};
pub use ring::{RingBuffer, capacity_for};
pub use stage::MonoStage;
