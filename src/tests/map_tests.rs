// SPDX-License-Identifier: Apache-2.0

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
  use crate::dispatch::{
    abs_diff_matrix_u8, blend_matrix_f32, parallel_abs_diff_matrix_u8, parallel_blend_matrix_f32,
  };
  use crate::test_utils::{seeded_f32_matrix, seeded_u8_matrix};
  use crate::types::Matrix;

  // =============================================================================
  // ABSOLUTE DIFFERENCE
  // =============================================================================

  #[test]
  fn test_abs_diff_cell_formula() {
    let a = seeded_u8_matrix(33, 5, 1); // Width not a multiple of any lane count
    let b = seeded_u8_matrix(33, 5, 2);

    let result = abs_diff_matrix_u8(&a, &b).unwrap();
    for y in 0..5 {
      for x in 0..33 {
        let expected = a.get(x, y).abs_diff(*b.get(x, y));
        assert_eq!(
          *result.get(x, y),
          expected,
          "cell ({}, {}) must equal |a - b|",
          x,
          y
        );
      }
    }
  }

  #[test]
  fn test_abs_diff_symmetry() {
    let a = seeded_u8_matrix(64, 48, 3);
    let b = seeded_u8_matrix(64, 48, 4);
    assert_eq!(
      abs_diff_matrix_u8(&a, &b).unwrap(),
      abs_diff_matrix_u8(&b, &a).unwrap(),
      "|a - b| must equal |b - a|"
    );
  }

  #[test]
  fn test_abs_diff_parallel_matches_serial() {
    for &(width, height) in &[(3usize, 7usize), (31, 3), (33, 5), (640, 480)] {
      let a = seeded_u8_matrix(width, height, 5);
      let b = seeded_u8_matrix(width, height, 6);

      let serial = abs_diff_matrix_u8(&a, &b).unwrap();
      let parallel = parallel_abs_diff_matrix_u8(&a, &b).unwrap();
      assert_eq!(
        serial, parallel,
        "parallel abs-diff must be cell-exact - {}x{}",
        width, height
      );
    }
  }

  #[test]
  fn test_abs_diff_constant_frames_checksum() {
    // Two 640x480 frames of constant 200 and 50: every output cell is 150
    let a = Matrix::from_fn(640, 480, |_, _| 200u8);
    let b = Matrix::from_fn(640, 480, |_, _| 50u8);

    let serial = abs_diff_matrix_u8(&a, &b).unwrap();
    let parallel = parallel_abs_diff_matrix_u8(&a, &b).unwrap();

    assert!(serial.as_slice().iter().all(|&v| v == 150));
    let expected_checksum = 150u64 * 640 * 480;
    assert_eq!(serial.checksum(), expected_checksum);
    assert_eq!(parallel.checksum(), expected_checksum);
  }

  // =============================================================================
  // ALPHA BLEND
  // =============================================================================

  #[test]
  fn test_blend_boundary_alphas_exact() {
    let a = seeded_f32_matrix(33, 20, 7);
    let b = seeded_f32_matrix(33, 20, 8);

    for blend in [blend_matrix_f32, parallel_blend_matrix_f32] {
      let at_zero = blend(&a, &b, 0.0).unwrap();
      assert_eq!(at_zero.as_slice(), a.as_slice(), "alpha=0 must return a");

      let at_one = blend(&a, &b, 1.0).unwrap();
      assert_eq!(at_one.as_slice(), b.as_slice(), "alpha=1 must return b");
    }
  }

  #[test]
  fn test_blend_known_midpoint() {
    let a = Matrix::from_fn(40, 4, |_, _| 10.0f32);
    let b = Matrix::from_fn(40, 4, |_, _| 200.0f32);

    let result = blend_matrix_f32(&a, &b, 0.5).unwrap();
    assert!(result.as_slice().iter().all(|&v| v == 105.0));
  }

  #[test]
  fn test_blend_monotonic_in_alpha() {
    let a = seeded_f32_matrix(64, 16, 9);
    let b = seeded_f32_matrix(64, 16, 10);

    let mut previous: Option<Matrix<f32>> = None;
    for step in 0..=10 {
      let alpha = step as f32 * 0.1;
      let current = parallel_blend_matrix_f32(&a, &b, alpha.min(1.0)).unwrap();

      if let Some(prev) = previous {
        for i in 0..current.as_slice().len() {
          let direction = b.as_slice()[i] - a.as_slice()[i];
          let delta = current.as_slice()[i] - prev.as_slice()[i];
          // Per cell the blend moves toward b as alpha grows; allow loose
          // slack for rounding when a and b nearly coincide
          assert!(
            delta * direction >= -1e-3,
            "cell {} not monotonic: delta={}, direction={}",
            i,
            delta,
            direction
          );
        }
      }
      previous = Some(current);
    }
  }

  #[test]
  fn test_blend_parallel_matches_serial_within_tolerance() {
    let a = seeded_f32_matrix(640, 480, 11);
    let b = seeded_f32_matrix(640, 480, 12);

    let serial = blend_matrix_f32(&a, &b, 0.4).unwrap();
    let parallel = parallel_blend_matrix_f32(&a, &b, 0.4).unwrap();

    for i in 0..serial.as_slice().len() {
      let s = serial.as_slice()[i];
      let p = parallel.as_slice()[i];
      let scale = s.abs().max(1e-3);
      assert!(
        (s - p).abs() <= 1e-5 * scale,
        "cell {} outside tolerance: serial={}, parallel={}",
        i,
        s,
        p
      );
    }
  }

  #[test]
  fn test_blend_default_alpha_spot_check() {
    // alpha = 0.4 over constant frames: 0.4*50 + 0.6*250 = 170
    let a = Matrix::from_fn(100, 10, |_, _| 250.0f32);
    let b = Matrix::from_fn(100, 10, |_, _| 50.0f32);

    let serial = blend_matrix_f32(&a, &b, 0.4).unwrap();
    let parallel = parallel_blend_matrix_f32(&a, &b, 0.4).unwrap();

    for (&s, &p) in serial.as_slice().iter().zip(parallel.as_slice()) {
      assert!((s - 170.0).abs() < 1e-4);
      assert!((p - 170.0).abs() < 1e-4);
    }
  }
}
