//! The complete hall: LFO, early diffusion, feedback tank, stereo taps.

use nimbus_core::{
    Allpass, DcBlocker, Interpolation, MonoStage, SampleAllocator, SineLfo, capacity_for,
    flush_denormal,
};

use crate::config::HallConfig;
use crate::error::HallError;
use crate::tank::TankHalf;
use crate::topology::{
    EARLY_ALLPASSES, LFO_FREQUENCY_HZ, TANK_A, TANK_A_MOD_DEPTH, TANK_A_TAPS, TANK_B,
    TANK_B_MOD_DEPTH, TANK_B_TAPS, TankTuning,
};

/// Number of delay lines in one unit.
pub const DELAY_LINE_COUNT: usize = 12;

/// Capacity of each delay line a [`ReverbUnit`] at `sample_rate` requests,
/// in allocation order.
///
/// Useful for sizing a [`PoolAllocator`](nimbus_core::PoolAllocator) up
/// front.
///
/// # Example
///
/// ```rust
/// use nimbus_core::PoolAllocator;
/// use nimbus_hall::{HallConfig, ReverbUnit, delay_line_capacities};
///
/// let pool = PoolAllocator::with_blocks(&delay_line_capacities(48000.0));
/// let _hall = ReverbUnit::new(&HallConfig::default(), &pool)?;
/// assert_eq!(pool.available(), 0);
/// # Ok::<(), nimbus_hall::HallError>(())
/// ```
pub fn delay_line_capacities(sample_rate: f32) -> [usize; DELAY_LINE_COUNT] {
    let early = EARLY_ALLPASSES.map(|ap| capacity_for(sample_rate, ap.delay));
    let tank = |t: &TankTuning| {
        [
            capacity_for(sample_rate, t.modulated.max_delay),
            capacity_for(sample_rate, t.delay_1.delay),
            capacity_for(sample_rate, t.allpass.delay),
            capacity_for(sample_rate, t.delay_2.delay),
        ]
    };
    let [a0, a1, a2, a3] = tank(&TANK_A);
    let [b0, b1, b2, b3] = tank(&TANK_B);
    [
        early[0], early[1], early[2], early[3], a0, a1, a2, a3, b0, b1, b2, b3,
    ]
}

/// One stereo output sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StereoFrame {
    /// Left channel.
    pub left: f32,
    /// Right channel.
    pub right: f32,
}

/// Unbuffered mono-in, stereo-out hall reverb.
///
/// Owns twelve delay lines whose storage comes from the allocator passed to
/// [`new`](Self::new). The allocator is borrowed for the unit's lifetime and
/// gets every block back when the unit is dropped.
///
/// ## Signal flow per sample
///
/// 1. Advance the LFO; scale cosine and sine into the two modulation offsets.
/// 2. Run the input through the four early allpasses in series.
/// 3. Add the previous sample's feedback, then DC-block.
/// 4. Tank half A, then tank half B. B's output becomes the next feedback.
/// 5. Sum eight taps (two per tank delay line) into a fresh stereo frame.
///
/// The tank only ever sees the previous feedback value, so the loop carries
/// one sample of delay beyond its delay lines.
///
/// # Example
///
/// ```rust
/// use nimbus_core::HeapAllocator;
/// use nimbus_hall::{HallConfig, ReverbUnit};
///
/// let heap = HeapAllocator;
/// let mut hall = ReverbUnit::new(&HallConfig::default(), &heap)?;
///
/// let frame = hall.process(1.0);
/// assert!(frame.left.is_finite() && frame.right.is_finite());
/// # Ok::<(), nimbus_hall::HallError>(())
/// ```
#[derive(Debug)]
pub struct ReverbUnit<'a, A: SampleAllocator + ?Sized> {
    config: HallConfig,
    lfo: SineLfo,
    early: [Allpass<'a, A>; 4],
    dc_blocker: DcBlocker,
    tank_a: TankHalf<'a, A>,
    tank_b: TankHalf<'a, A>,
    feedback: f32,
}

impl<'a, A: SampleAllocator + ?Sized> ReverbUnit<'a, A> {
    /// Validate `config` and allocate every delay line from `allocator`.
    ///
    /// Lines are allocated in signal order: early allpasses, then tank A,
    /// then tank B.
    ///
    /// # Errors
    ///
    /// - [`HallError::InvalidSampleRate`] if the config fails validation.
    /// - [`HallError::AllocationFailed`] naming the first line the allocator
    ///   could not supply. Nothing is leaked: lines already built hand their
    ///   storage back before this returns.
    pub fn new(config: &HallConfig, allocator: &'a A) -> Result<Self, HallError> {
        config.validate()?;
        let sample_rate = config.sample_rate;

        let early_allpass = |index: usize| {
            let tuning = &EARLY_ALLPASSES[index];
            Allpass::new(allocator, sample_rate, tuning.delay, tuning.k)
                .map_err(HallError::allocation(tuning.name))
        };
        let early = [
            early_allpass(0)?,
            early_allpass(1)?,
            early_allpass(2)?,
            early_allpass(3)?,
        ];

        let tank_a = TankHalf::new(allocator, sample_rate, &TANK_A, config.interpolation)?;
        let tank_b = TankHalf::new(allocator, sample_rate, &TANK_B, config.interpolation)?;

        let mut lfo = SineLfo::new(sample_rate);
        lfo.set_frequency(LFO_FREQUENCY_HZ);

        let unit = Self {
            config: *config,
            lfo,
            early,
            dc_blocker: DcBlocker::new(),
            tank_a,
            tank_b,
            feedback: 0.0,
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            sample_rate,
            buffer_size = config.buffer_size,
            interpolation = ?config.interpolation,
            allocated_samples = unit.allocated_samples(),
            "hall_init: reverb unit ready"
        );

        Ok(unit)
    }

    /// Process one mono sample into one stereo frame.
    ///
    /// Never allocates and never fails.
    #[inline]
    pub fn process(&mut self, input: f32) -> StereoFrame {
        let (cosine, sine) = self.lfo.process();
        let offset_a = cosine * TANK_A_MOD_DEPTH;
        let offset_b = sine * TANK_B_MOD_DEPTH;

        let mut sound = input;
        for allpass in &mut self.early {
            allpass.process_in_place(&mut sound);
        }

        sound += self.feedback;
        self.dc_blocker.process_in_place(&mut sound);

        sound = self.tank_a.process(sound, offset_a);
        sound = self.tank_b.process(sound, offset_b);
        debug_assert!(sound.is_finite(), "tank output is not finite: {sound}");
        self.feedback = flush_denormal(sound);

        let mut frame = StereoFrame::default();
        self.tank_a.tap_into(&TANK_A_TAPS, &mut frame);
        self.tank_b.tap_into(&TANK_B_TAPS, &mut frame);
        frame
    }

    /// Switch both modulated allpasses to `interpolation`.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.config.interpolation = interpolation;
        self.tank_a.set_interpolation(interpolation);
        self.tank_b.set_interpolation(interpolation);
    }

    /// Total samples held across all twelve delay lines.
    pub fn allocated_samples(&self) -> usize {
        self.early.iter().map(Allpass::capacity).sum::<usize>()
            + self.tank_a.allocated_samples()
            + self.tank_b.allocated_samples()
    }

    /// Value that will be added to the next input.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Current `(cosine, sine)` of the modulation LFO.
    pub fn lfo_state(&self) -> (f32, f32) {
        self.lfo.state()
    }

    /// Sample rate the unit was built for.
    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    /// Host block size recorded at construction.
    pub fn buffer_size(&self) -> usize {
        self.config.buffer_size
    }

    /// Configuration the unit was built from, with the current
    /// interpolation.
    pub fn config(&self) -> &HallConfig {
        &self.config
    }
}
