//! Nimbus Hall - unbuffered stereo hall reverb
//!
//! One mono sample in, one stereo frame out. The signal passes four series
//! diffusers, then circulates through a two-half tank of modulated allpasses,
//! delays and tone filters. The stereo image is built from taps on the tank's
//! delay lines, with sub-millisecond offsets between the channels.
//!
//! # Quick start
//!
//! ```rust
//! use nimbus_core::HeapAllocator;
//! use nimbus_hall::{HallConfig, ReverbUnit};
//!
//! let heap = HeapAllocator;
//! let mut hall = ReverbUnit::new(&HallConfig::new(48000.0), &heap)?;
//!
//! let mut tail = Vec::new();
//! for n in 0..4800 {
//!     let input = if n == 0 { 1.0 } else { 0.0 };
//!     tail.push(hall.process(input));
//! }
//! # Ok::<(), nimbus_hall::HallError>(())
//! ```
//!
//! # Memory
//!
//! Every delay line is allocated from the [`SampleAllocator`] passed at
//! construction and returned to it when the unit is dropped. To build a
//! unit without touching the global heap, pre-fill a
//! [`PoolAllocator`](nimbus_core::PoolAllocator) from
//! [`delay_line_capacities`].
//!
//! # Features
//!
//! - `std` (default): std error integration.
//! - `tracing`: construction-time `tracing` events.
//! - `serde`: `Serialize`/`Deserialize` for [`HallConfig`].
//!
//! [`SampleAllocator`]: nimbus_core::SampleAllocator

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod tank;
pub mod topology;
pub mod unit;

pub use config::HallConfig;
pub use error::HallError;
pub use tank::TankHalf;
pub use unit::{DELAY_LINE_COUNT, ReverbUnit, StereoFrame, delay_line_capacities};
