//! Deterministic test signals.
//!
//! Everything is seeded, so a failing test reproduces with the same data.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Creates a PCG32 generator from a 32-bit seed.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Uniform 16-bit noise covering the full range, including both extremes.
pub fn noise_i16(seed: u32, len: usize) -> Vec<i16> {
    let mut rng = create_rng(seed);
    let mut samples: Vec<i16> = (0..len).map(|_| rng.gen()).collect();
    if len >= 2 {
        samples[0] = i16::MIN;
        samples[len - 1] = i16::MAX;
    }
    samples
}

/// Uniform 8-bit noise.
pub fn noise_u8(seed: u32, len: usize) -> Vec<u8> {
    let mut rng = create_rng(seed);
    (0..len).map(|_| rng.gen()).collect()
}

/// Uniform float noise in `[-1, 1)`.
pub fn noise_f32(seed: u32, len: usize) -> Vec<f32> {
    let mut rng = create_rng(seed);
    (0..len).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

/// Interleaved sine at `freq` Hz with the same phase on every channel.
pub fn sine_f32(freq: f32, sample_rate: u32, channels: u16, frames: usize) -> Vec<f32> {
    let step = 2.0 * std::f32::consts::PI * freq / sample_rate as f32;
    (0..frames)
        .flat_map(|i| {
            let v = (step * i as f32).sin() * 0.8;
            std::iter::repeat(v).take(channels as usize)
        })
        .collect()
}

/// Ramp that encodes its own index, so misplaced reads are obvious.
pub fn ramp_i16(len: usize) -> Vec<i16> {
    (0..len).map(|i| (i % 32768) as i16).collect()
}
