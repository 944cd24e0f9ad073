//! Fixed voicing of the hall.
//!
//! Every delay length, coefficient and tap lives here as a named constant.
//! Times are in seconds and scale with sample rate; coefficients do not.
//!
//! ```text
//!  in ─► E1 ─► E2 ─► E3 ─► E4 ─► (+) ─► DC ─► ┌ tank A ┐ ─► ┌ tank B ┐ ─┬─► feedback
//!                                 ▲           └────────┘    └────────┘  │
//!                                 └──────────── z^-1 ───────────────────┘
//!
//!  tank half:  VAP(lfo) ─► D1 ─► AP ─► D2 ─► HiShelf ─► ×0.8
//!
//!  left  = Σ taps on A.D1, A.D2, B.D1, B.D2 (set 1)
//!  right = Σ taps on the same lines (set 2), offset by under a millisecond
//! ```

/// Quadrature LFO rate in Hz.
pub const LFO_FREQUENCY_HZ: f32 = 0.5;

/// Peak read-position swing of tank A's modulated allpass, in seconds.
/// Driven by the LFO cosine.
pub const TANK_A_MOD_DEPTH: f32 = 0.32e-3;

/// Peak read-position swing of tank B's modulated allpass, in seconds.
/// Driven by the LFO sine; the sign inverts the sweep direction.
pub const TANK_B_MOD_DEPTH: f32 = -0.45e-3;

/// Gain applied at the end of each tank half.
pub const TANK_HALF_GAIN: f32 = 0.8;

/// A fixed allpass: name, loop delay in seconds, coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllpassTuning {
    /// Delay-line name used in errors and logs.
    pub name: &'static str,
    /// Loop delay in seconds.
    pub delay: f32,
    /// Feedback/feedforward coefficient.
    pub k: f32,
}

/// A modulated allpass: buffer headroom, nominal delay, coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulatedTuning {
    /// Delay-line name used in errors and logs.
    pub name: &'static str,
    /// Buffer headroom in seconds.
    pub max_delay: f32,
    /// Unmodulated loop delay in seconds.
    pub delay: f32,
    /// Feedback/feedforward coefficient.
    pub k: f32,
}

/// A plain delay line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayTuning {
    /// Delay-line name used in errors and logs.
    pub name: &'static str,
    /// Delay in seconds.
    pub delay: f32,
}

/// One half of the tank, in signal order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankTuning {
    /// Entry allpass, swept by the LFO.
    pub modulated: ModulatedTuning,
    /// Short delay after the modulated allpass.
    pub delay_1: DelayTuning,
    /// Fixed allpass between the two delays.
    pub allpass: AllpassTuning,
    /// Long delay feeding the tone filter.
    pub delay_2: DelayTuning,
}

/// One output tap: read offset in seconds and gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Offset toward newer material, in seconds. See
    /// [`Delay::tap`](nimbus_core::Delay::tap).
    pub offset: f32,
    /// Linear gain.
    pub gain: f32,
}

/// The left and right taps taken from one delay line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoTaps {
    /// Tap summed into the left channel.
    pub left: Tap,
    /// Tap summed into the right channel.
    pub right: Tap,
}

const fn tap(offset: f32, gain: f32) -> Tap {
    Tap { offset, gain }
}

/// Series diffusers ahead of the tank.
pub const EARLY_ALLPASSES: [AllpassTuning; 4] = [
    AllpassTuning {
        name: "early_1",
        delay: 3.5e-3,
        k: 0.725,
    },
    AllpassTuning {
        name: "early_2",
        delay: 5.0e-3,
        k: 0.633,
    },
    AllpassTuning {
        name: "early_3",
        delay: 8.5e-3,
        k: 0.814,
    },
    AllpassTuning {
        name: "early_4",
        delay: 10.2e-3,
        k: 0.611,
    },
];

/// First tank half.
pub const TANK_A: TankTuning = TankTuning {
    modulated: ModulatedTuning {
        name: "tank_a.modulated",
        max_delay: 100e-3,
        delay: 25.6e-3,
        k: 0.55,
    },
    delay_1: DelayTuning {
        name: "tank_a.delay_1",
        delay: 6.3e-3,
    },
    allpass: AllpassTuning {
        name: "tank_a.allpass",
        delay: 31.4e-3,
        k: 0.63,
    },
    delay_2: DelayTuning {
        name: "tank_a.delay_2",
        delay: 120.6e-3,
    },
};

/// Second tank half. Its output is the feedback scalar.
pub const TANK_B: TankTuning = TankTuning {
    modulated: ModulatedTuning {
        name: "tank_b.modulated",
        max_delay: 100e-3,
        delay: 40.7e-3,
        k: 0.55,
    },
    delay_1: DelayTuning {
        name: "tank_b.delay_1",
        delay: 8.2e-3,
    },
    allpass: AllpassTuning {
        name: "tank_b.allpass",
        delay: 65.6e-3,
        k: -0.63,
    },
    delay_2: DelayTuning {
        name: "tank_b.delay_2",
        delay: 180.3e-3,
    },
};

/// Taps on tank A's `delay_1` and `delay_2`.
///
/// The right channel reads slightly newer material than the left. Offsets
/// stay under a millisecond, inside the Haas fusion window.
pub const TANK_A_TAPS: [StereoTaps; 2] = [
    StereoTaps {
        left: tap(0.0, 0.5),
        right: tap(0.750e-3, 0.4),
    },
    StereoTaps {
        left: tap(0.0, 0.8),
        right: tap(0.712e-3, 1.0),
    },
];

/// Taps on tank B's `delay_1` and `delay_2`. Here the left channel carries
/// the offset.
pub const TANK_B_TAPS: [StereoTaps; 2] = [
    StereoTaps {
        left: tap(0.538e-3, 0.4),
        right: tap(0.0, 0.5),
    },
    StereoTaps {
        left: tap(0.65e-3, 0.8),
        right: tap(0.0, 1.0),
    },
];
