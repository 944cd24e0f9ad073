//! One half of the recirculating tank.

use nimbus_core::{
    Allpass, Delay, HiShelf, Interpolation, MonoStage, SampleAllocator, VariableAllpass,
};

use crate::error::HallError;
use crate::topology::{StereoTaps, TANK_HALF_GAIN, TankTuning};
use crate::unit::StereoFrame;

/// Modulated allpass, delay, allpass, delay, tone filter, gain.
///
/// The two delay lines double as the output tap points for the stereo mix.
#[derive(Debug)]
pub struct TankHalf<'a, A: SampleAllocator + ?Sized> {
    modulated: VariableAllpass<'a, A>,
    delay_1: Delay<'a, A>,
    allpass: Allpass<'a, A>,
    delay_2: Delay<'a, A>,
    tone: HiShelf,
}

impl<'a, A: SampleAllocator + ?Sized> TankHalf<'a, A> {
    /// Allocate the four delay lines of one tank half, in signal order.
    ///
    /// # Errors
    ///
    /// [`HallError::AllocationFailed`] naming the first line the allocator
    /// could not supply. Lines built before it are released on return.
    pub fn new(
        allocator: &'a A,
        sample_rate: f32,
        tuning: &TankTuning,
        interpolation: Interpolation,
    ) -> Result<Self, HallError> {
        let m = &tuning.modulated;
        let mut modulated = VariableAllpass::new(allocator, sample_rate, m.max_delay, m.delay, m.k)
            .map_err(HallError::allocation(m.name))?;
        modulated.set_interpolation(interpolation);

        let delay_1 = Delay::new(allocator, sample_rate, tuning.delay_1.delay)
            .map_err(HallError::allocation(tuning.delay_1.name))?;
        let allpass = Allpass::new(
            allocator,
            sample_rate,
            tuning.allpass.delay,
            tuning.allpass.k,
        )
        .map_err(HallError::allocation(tuning.allpass.name))?;
        let delay_2 = Delay::new(allocator, sample_rate, tuning.delay_2.delay)
            .map_err(HallError::allocation(tuning.delay_2.name))?;

        Ok(Self {
            modulated,
            delay_1,
            allpass,
            delay_2,
            tone: HiShelf::new(),
        })
    }

    /// Run one sample through the half. `offset` is the modulated
    /// allpass's read shift in seconds.
    #[inline]
    pub fn process(&mut self, input: f32, offset: f32) -> f32 {
        let mut sound = input;
        self.modulated.process_in_place(&mut sound, offset);
        self.delay_1.process_in_place(&mut sound);
        self.allpass.process_in_place(&mut sound);
        self.delay_2.process_in_place(&mut sound);
        self.tone.process_in_place(&mut sound);
        sound * TANK_HALF_GAIN
    }

    /// Accumulate `taps[0]` from `delay_1` and `taps[1]` from `delay_2`
    /// into `frame`.
    #[inline]
    pub fn tap_into(&self, taps: &[StereoTaps; 2], frame: &mut StereoFrame) {
        for (line, pair) in [&self.delay_1, &self.delay_2].into_iter().zip(taps) {
            line.tap(pair.left.offset, pair.left.gain, &mut frame.left);
            line.tap(pair.right.offset, pair.right.gain, &mut frame.right);
        }
    }

    /// Change the fractional-read method of the modulated allpass.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.modulated.set_interpolation(interpolation);
    }

    /// Samples held by this half's four delay lines.
    pub fn allocated_samples(&self) -> usize {
        self.modulated.capacity()
            + self.delay_1.capacity()
            + self.allpass.capacity()
            + self.delay_2.capacity()
    }

    /// The short delay line (first tap point).
    pub fn delay_1(&self) -> &Delay<'a, A> {
        &self.delay_1
    }

    /// The long delay line (second tap point).
    pub fn delay_2(&self) -> &Delay<'a, A> {
        &self.delay_2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{TANK_A, TANK_A_TAPS};
    use nimbus_core::HeapAllocator;

    #[test]
    fn impulse_emerges_after_full_path() {
        let heap = HeapAllocator;
        let mut half = TankHalf::new(&heap, 48000.0, &TANK_A, Interpolation::Linear).unwrap();

        // Only the allpasses' direct paths are instantaneous; the two delays
        // hold everything back for delay_1 + delay_2 samples.
        let hold = half.delay_1().delay_samples() + half.delay_2().delay_samples();
        assert_eq!(half.process(1.0, 0.0), 0.0);
        for n in 1..hold {
            assert_eq!(half.process(0.0, 0.0), 0.0, "early output at {n}");
        }
        let first = half.process(0.0, 0.0);
        // -k_mod * -k_ap * (1 - k_tone) * gain
        let expected = -0.55 * -0.63 * 0.7 * 0.8;
        assert!((first - expected).abs() < 1e-6, "got {first}");
    }

    #[test]
    fn taps_read_without_advancing() {
        let heap = HeapAllocator;
        let mut half = TankHalf::new(&heap, 48000.0, &TANK_A, Interpolation::Linear).unwrap();
        for n in 0..20_000 {
            half.process(if n % 97 == 0 { 1.0 } else { 0.0 }, 0.0);
        }
        let cursor = half.delay_2().cursor();

        let mut a = StereoFrame::default();
        let mut b = StereoFrame::default();
        half.tap_into(&TANK_A_TAPS, &mut a);
        half.tap_into(&TANK_A_TAPS, &mut b);
        assert_eq!(a, b);
        assert_eq!(half.delay_2().cursor(), cursor);
    }

    #[test]
    fn allocated_samples_sums_capacities() {
        let heap = HeapAllocator;
        let half = TankHalf::new(&heap, 48000.0, &TANK_A, Interpolation::Cubic).unwrap();
        assert_eq!(half.allocated_samples(), 8192 + 512 + 2048 + 8192);
    }
}
