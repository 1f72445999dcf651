// SPDX-License-Identifier: Apache-2.0

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Matrix;

/// Test-only helpers.
///
/// Keep this module lightweight so `cargo test` works out of the box.
pub fn config_test_logger() {
    // Intentionally a no-op.
    // Some tests call this to enable logging in downstream repos; parx doesn't
    // require a logger for correctness.
}

/// Deterministic f32 fixture in `[0, 1)`.
pub fn seeded_f32_values(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random::<f32>()).collect()
}

/// Deterministic u8 matrix fixture.
pub fn seeded_u8_matrix(width: usize, height: usize, seed: u64) -> Matrix<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::from_fn(width, height, |_, _| rng.random::<u8>())
}

/// Deterministic f32 matrix fixture with grayscale-range values in `[0, 256)`.
pub fn seeded_f32_matrix(width: usize, height: usize, seed: u64) -> Matrix<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::from_fn(width, height, |_, _| rng.random_range(0.0..256.0))
}
