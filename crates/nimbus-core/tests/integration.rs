//! Integration tests for nimbus-core primitives.
//!
//! Signal-level measurements across modules: allpass energy conservation,
//! DC blocker settling, tone filter step response, LFO envelope, and the
//! ownership contract between delay lines and their allocator.

use core::cell::Cell;

use nimbus_core::{
    AllocError, Allpass, DcBlocker, Delay, HeapAllocator, HiShelf, MonoStage, PoolAllocator,
    SampleAllocator, SineLfo, VariableAllpass, capacity_for,
};

const SAMPLE_RATE: f32 = 48000.0;

/// Heap allocator that counts blocks handed out and returned.
#[derive(Default)]
struct CountingAllocator {
    allocated: Cell<usize>,
    freed: Cell<usize>,
}

impl SampleAllocator for CountingAllocator {
    fn allocate(&self, len: usize) -> Option<Box<[f32]>> {
        self.allocated.set(self.allocated.get() + 1);
        HeapAllocator.allocate(len)
    }

    fn deallocate(&self, block: Box<[f32]>) {
        self.freed.set(self.freed.get() + 1);
        HeapAllocator.deallocate(block);
    }
}

// ============================================================================
// 1. Signal behaviour
// ============================================================================

#[test]
fn allpass_impulse_energy_is_conserved() {
    let heap = HeapAllocator;
    for &(delay, k) in &[(3.5e-3, 0.725), (8.5e-3, 0.814), (65.6e-3, -0.63)] {
        let mut allpass = Allpass::new(&heap, SAMPLE_RATE, delay, k).unwrap();
        let mut energy = 0.0_f64;
        for n in 0..240_000 {
            let x = if n == 0 { 1.0 } else { 0.0 };
            let y = f64::from(allpass.process(x));
            energy += y * y;
        }
        assert!(
            (energy - 1.0).abs() < 1e-3,
            "allpass ({delay} s, k={k}) energy {energy} should be 1"
        );
    }
}

#[test]
fn dc_blocker_settles_at_48k() {
    for &level in &[1.0, -0.5, 0.01] {
        let mut blocker = DcBlocker::new();
        let mut out = 0.0;
        for _ in 0..2000 {
            out = blocker.process(level);
        }
        assert!(out.abs() < 1e-4, "constant {level}: residual {out}");
    }
}

#[test]
fn hi_shelf_step_settles_at_level() {
    for &level in &[1.0, -0.25, 3.0] {
        let mut tone = HiShelf::new();
        let mut out = 0.0;
        for _ in 0..8 {
            out = tone.process(level);
        }
        assert!((out - level).abs() < 1e-6, "step {level} settled at {out}");
    }
}

#[test]
fn lfo_envelope_stays_within_one_percent() {
    let mut lfo = SineLfo::new(SAMPLE_RATE);
    lfo.set_frequency(0.5);
    for n in 0..48_000 {
        let (cosine, sine) = lfo.process();
        let envelope = cosine * cosine + sine * sine;
        assert!(
            (envelope - 1.0).abs() < 0.01,
            "cos^2 + sin^2 = {envelope} at sample {n}"
        );
    }
}

#[test]
fn lfo_full_cycle_returns_near_start() {
    let mut lfo = SineLfo::new(SAMPLE_RATE);
    lfo.set_frequency(0.5);
    // One period at 0.5 Hz is two seconds.
    for _ in 0..96_000 {
        lfo.process();
    }
    let (cosine, sine) = lfo.state();
    assert!((cosine - 1.0).abs() < 0.01, "cos = {cosine}");
    assert!(sine.abs() < 0.01, "sin = {sine}");
}

#[test]
fn modulated_allpass_follows_lfo_without_blowing_up() {
    let heap = HeapAllocator;
    let mut lfo = SineLfo::new(SAMPLE_RATE);
    lfo.set_frequency(0.5);
    let mut allpass = VariableAllpass::new(&heap, SAMPLE_RATE, 100e-3, 25.6e-3, 0.55).unwrap();

    let mut energy = 0.0_f64;
    for n in 0..96_000 {
        let (cosine, _) = lfo.process();
        let x = if n == 0 { 1.0 } else { 0.0 };
        let y = allpass.process(x, cosine * 0.32e-3);
        assert!(y.is_finite(), "non-finite output at {n}");
        energy += f64::from(y * y);
    }
    assert!(energy < 1.1, "energy {energy}");
    // The direct path alone carries k^2.
    assert!(energy > 0.3, "energy {energy}");
}

// ============================================================================
// 2. Allocator ownership
// ============================================================================

#[test]
fn every_block_is_returned_exactly_once() {
    let counter = CountingAllocator::default();
    {
        let _delay = Delay::new(&counter, SAMPLE_RATE, 120.6e-3).unwrap();
        let _allpass = Allpass::new(&counter, SAMPLE_RATE, 31.4e-3, 0.63).unwrap();
        let _variable = VariableAllpass::new(&counter, SAMPLE_RATE, 100e-3, 40.7e-3, 0.55).unwrap();
        assert_eq!(counter.allocated.get(), 3);
        assert_eq!(counter.freed.get(), 0);
    }
    assert_eq!(counter.freed.get(), 3);
}

#[test]
fn pool_exhaustion_reports_requested_capacity() {
    let pool = PoolAllocator::with_blocks(&[512]);
    let first = Delay::new(&pool, SAMPLE_RATE, 6.3e-3).unwrap();
    assert_eq!(first.capacity(), 512);

    let err = Delay::new(&pool, SAMPLE_RATE, 8.2e-3).unwrap_err();
    assert_eq!(
        err,
        AllocError {
            requested: capacity_for(SAMPLE_RATE, 8.2e-3)
        }
    );
    assert_eq!(err.requested, 512);

    drop(first);
    assert!(Delay::new(&pool, SAMPLE_RATE, 8.2e-3).is_ok());
}

#[test]
fn pool_block_larger_than_needed_is_masked_to_capacity() {
    let pool = PoolAllocator::with_blocks(&[4096]);
    let mut delay = Delay::new(&pool, 1000.0, 0.01).unwrap();
    assert_eq!(delay.capacity(), 16);

    for i in 0..40 {
        let out = delay.process(i as f32);
        let expected = if i >= 10 { (i - 10) as f32 } else { 0.0 };
        assert_eq!(out, expected);
    }
    drop(delay);
    assert_eq!(pool.available_samples(), 4096);
}

#[test]
fn alloc_error_displays_request() {
    let err = AllocError { requested: 8192 };
    assert_eq!(
        err.to_string(),
        "allocator could not supply a block of 8192 samples"
    );
}
