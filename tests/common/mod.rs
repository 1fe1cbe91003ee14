//! Shared data generators and assertions for the integration tests.
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SEED: u64 = 0x5EED_A7E1;

/// Orders swept by the equivalence tests: 1, 2, 4, ..., 128.
pub fn power_of_two_orders() -> Vec<usize> {
    (0..8).map(|p| 1usize << p).collect()
}

/// Small value range so ties and plateaus show up often.
pub fn random_i32(len: usize, seed: u64) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-50..50)).collect()
}

pub fn random_i64(len: usize, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-1_000i64..1_000)).collect()
}

pub fn random_f32(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

/// Uniform floats with rounded runs mixed in to exercise equal neighbors.
pub fn random_f64(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let v: f64 = rng.gen_range(-100.0..100.0);
            if rng.gen_bool(0.2) {
                v.round()
            } else {
                v
            }
        })
        .collect()
}

pub fn assert_masks_equal(expected: &[bool], got: &[bool], ctx: &str) {
    assert_eq!(expected.len(), got.len(), "[{}] length differs", ctx);
    if let Some(i) = expected.iter().zip(got).position(|(a, b)| a != b) {
        panic!(
            "[{}] masks differ at index {}: sequential={} parallel={}",
            ctx, i, expected[i], got[i]
        );
    }
}
