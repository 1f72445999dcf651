// SPDX-License-Identifier: Apache-2.0

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
  use crate::dispatch::{
    abs_diff_matrix_u8, blend_matrix_f32, get_hw_capabilities, parallel_abs_diff_matrix_u8,
    parallel_blend_matrix_f32, parallel_reduce_mean_std_f32, parallel_reduce_min_f32,
    reduce_mean_std_f32, reduce_min_f32,
  };
  use crate::test_utils::{seeded_f32_matrix, seeded_f32_values, seeded_u8_matrix};
  use crate::types::{Matrix, ParxError};

  #[test]
  fn test_hardware_capabilities_are_consistent() {
    let caps = get_hw_capabilities();

    #[cfg(target_arch = "aarch64")]
    {
      assert!(!caps.has_avx2, "AVX2 cannot be present on aarch64");
      assert!(caps.has_neon, "NEON is mandatory on aarch64");
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    assert!(!caps.has_neon, "NEON cannot be present on x86");

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    {
      assert!(!caps.has_avx2);
      assert!(!caps.has_neon);
    }
  }

  // =============================================================================
  // INPUT VALIDATION
  // =============================================================================

  #[test]
  fn test_reductions_reject_empty_input() {
    let empty: Vec<f32> = Vec::new();

    assert!(matches!(
      reduce_min_f32(&empty),
      Err(ParxError::EmptyInput(_))
    ));
    assert!(matches!(
      parallel_reduce_min_f32(&empty),
      Err(ParxError::EmptyInput(_))
    ));
    assert!(matches!(
      reduce_mean_std_f32(&empty),
      Err(ParxError::EmptyInput(_))
    ));
    assert!(matches!(
      parallel_reduce_mean_std_f32(&empty),
      Err(ParxError::EmptyInput(_))
    ));
  }

  #[test]
  fn test_maps_reject_empty_matrices() {
    let a: Matrix<u8> = Matrix::new(0, 0);
    let b: Matrix<u8> = Matrix::new(0, 0);
    assert!(matches!(
      abs_diff_matrix_u8(&a, &b),
      Err(ParxError::EmptyInput(_))
    ));
    assert!(matches!(
      parallel_abs_diff_matrix_u8(&a, &b),
      Err(ParxError::EmptyInput(_))
    ));

    let c: Matrix<f32> = Matrix::new(0, 0);
    let d: Matrix<f32> = Matrix::new(0, 0);
    assert!(matches!(
      blend_matrix_f32(&c, &d, 0.5),
      Err(ParxError::EmptyInput(_))
    ));
    assert!(matches!(
      parallel_blend_matrix_f32(&c, &d, 0.5),
      Err(ParxError::EmptyInput(_))
    ));
  }

  #[test]
  fn test_maps_reject_mismatched_shapes() {
    let a = seeded_u8_matrix(16, 16, 1);
    let b = seeded_u8_matrix(16, 15, 2);
    assert!(matches!(
      abs_diff_matrix_u8(&a, &b),
      Err(ParxError::DimensionMismatch(_))
    ));
    assert!(matches!(
      parallel_abs_diff_matrix_u8(&a, &b),
      Err(ParxError::DimensionMismatch(_))
    ));

    let c = seeded_f32_matrix(16, 16, 3);
    let d = seeded_f32_matrix(15, 16, 4);
    assert!(matches!(
      blend_matrix_f32(&c, &d, 0.5),
      Err(ParxError::DimensionMismatch(_))
    ));
    assert!(matches!(
      parallel_blend_matrix_f32(&c, &d, 0.5),
      Err(ParxError::DimensionMismatch(_))
    ));
  }

  #[test]
  fn test_blend_rejects_out_of_range_alpha() {
    let a = seeded_f32_matrix(8, 8, 5);
    let b = seeded_f32_matrix(8, 8, 6);

    for bad_alpha in [-0.1f32, 1.1, f32::NAN] {
      assert!(matches!(
        blend_matrix_f32(&a, &b, bad_alpha),
        Err(ParxError::InvalidParameter(_))
      ));
      assert!(matches!(
        parallel_blend_matrix_f32(&a, &b, bad_alpha),
        Err(ParxError::InvalidParameter(_))
      ));
    }
  }

  // =============================================================================
  // THRESHOLD ROUTING
  // =============================================================================

  #[test]
  fn test_parallel_entry_points_agree_below_and_above_thresholds() {
    // Sizes on either side of the parallel cutover must produce the same
    // answers through both entry points
    for &len in &[10usize, 100, 8_191, 8_193, 20_000] {
      let values = seeded_f32_values(len, len as u64);

      let serial_min = reduce_min_f32(&values).unwrap();
      let parallel_min = parallel_reduce_min_f32(&values).unwrap();
      assert_eq!(serial_min, parallel_min, "min diverged at len {}", len);

      let serial_stats = reduce_mean_std_f32(&values).unwrap();
      let parallel_stats = parallel_reduce_mean_std_f32(&values).unwrap();
      assert!(
        (serial_stats.mean - parallel_stats.mean).abs() <= 1e-9 * serial_stats.mean.abs().max(1.0),
        "mean diverged at len {}",
        len
      );
      assert!(
        (serial_stats.std_dev - parallel_stats.std_dev).abs()
          <= 1e-6 * serial_stats.std_dev.abs().max(1.0),
        "std dev diverged at len {}",
        len
      );
    }

    for &(width, height) in &[(8usize, 8usize), (64, 64), (640, 480)] {
      let a = seeded_u8_matrix(width, height, 7);
      let b = seeded_u8_matrix(width, height, 8);
      assert_eq!(
        abs_diff_matrix_u8(&a, &b).unwrap(),
        parallel_abs_diff_matrix_u8(&a, &b).unwrap(),
        "abs-diff diverged at {}x{}",
        width,
        height
      );
    }
  }
}
