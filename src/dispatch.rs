// SPDX-License-Identifier: Apache-2.0

//! # parx dispatch framework
//!
//! This module contains the dispatch layer used across the crate: it
//! validates input, chooses between scalar baselines and SIMD-accelerated
//! kernels based on target capabilities and input sizes, and orchestrates the
//! parallel variants over the worker pool.
//!
//! Every kernel comes in two public flavors: the serial baseline (a plain
//! scalar pass, the reference the benchmarks measure against) and the
//! parallel variant (partitioned across workers, SIMD within each worker,
//! partials merged after the fork-join barrier).

use log::trace;

use super::constants::*;

#[cfg(target_arch = "aarch64")]
use std::arch::is_aarch64_feature_detected;

use crate::types::{Matrix, MeanStd, MinResult, ParxError, Result, SumPartial};
use crate::{map, partition, reduce};

// =============================================================================
//  HARDWARE DETECTION & SIMD CAPABILITIES
// =============================================================================

/// Hardware capability detection used by the parx dispatch layer
pub struct HardwareCapabilities {
    pub has_avx2: bool,
    pub has_neon: bool,
}

impl HardwareCapabilities {
    /// Detect SIMD capabilities at runtime.
    ///
    /// Checks for the presence of SIMD instruction sets on the target:
    /// AVX2 on x86/x86_64, NEON on aarch64. Detection results are cached by
    /// the standard library's feature-detection macros, so calling this per
    /// dispatch is cheap.
    #[inline]
    pub fn detect() -> Self {
        HardwareCapabilities {
            has_avx2: Self::detect_avx2(),
            has_neon: Self::detect_neon(),
        }
    }

    fn detect_avx2() -> bool {
        #[allow(unused_mut)]
        let mut detected_avx2 = false;

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        if is_x86_feature_detected!("avx2") {
            detected_avx2 = true;
        }

        detected_avx2
    }

    fn detect_neon() -> bool {
        #[allow(unused_mut)]
        let mut detected_neon = false;

        #[cfg(target_arch = "aarch64")]
        if is_aarch64_feature_detected!("neon") {
            detected_neon = true;
        }

        detected_neon
    }
}

/// Get information about available SIMD capabilities
#[inline]
pub fn get_hw_capabilities() -> HardwareCapabilities {
    HardwareCapabilities::detect()
}

// =============================================================================
// REDUCTION DISPATCH
// =============================================================================

/// Find the minimum value and its index with the serial baseline.
///
/// A single left-to-right scalar scan updating on strict `<`, so the first
/// occurrence of the minimum wins. This is the reference implementation the
/// benchmarks time the parallel variant against; it never dispatches to SIMD.
///
/// # Arguments
/// * `values` - Input array of f32 values
///
/// # Returns
/// * `Ok(MinResult)` - Minimum value and the lowest index where it occurs
/// * `Err(ParxError::EmptyInput)` - If the array is empty
///
/// # Examples
/// ```rust
/// use parx::reduce_min_f32;
/// let values = vec![3.5, 1.2, 4.8, 1.2];
/// let min = reduce_min_f32(&values)?;
/// assert_eq!(min.value, 1.2);
/// assert_eq!(min.index, 1);
/// # Ok::<(), parx::types::ParxError>(())
/// ```
#[inline]
pub fn reduce_min_f32(values: &[f32]) -> Result<MinResult> {
    trace!("REDUCE_MIN_F32 DISPATCH: values.len()={}", values.len());

    if values.is_empty() {
        return Err(ParxError::EmptyInput(
            "reduce_min_f32 requires at least one element".to_string(),
        ));
    }

    Ok(reduce::reduce_min_f32_scalar(values))
}

/// Find the minimum value and its index with the parallel variant.
///
/// The buffer is split into contiguous per-worker ranges; each worker runs
/// the SIMD min-with-index kernel over its range, and the per-worker partials
/// are merged after the barrier with a lowest-index tie-break. The result is
/// bit-identical to [`reduce_min_f32`] for any input, including inputs with
/// duplicate minima.
///
/// # Performance
/// - Small arrays (< PARALLEL_THRESHOLD_REDUCE): single-threaded SIMD
/// - Large arrays: partitioned across the worker pool
#[inline]
pub fn parallel_reduce_min_f32(values: &[f32]) -> Result<MinResult> {
    trace!(
        "PARALLEL_REDUCE_MIN_F32 DISPATCH: values.len()={}",
        values.len()
    );

    if values.is_empty() {
        return Err(ParxError::EmptyInput(
            "parallel_reduce_min_f32 requires at least one element".to_string(),
        ));
    }

    let len = values.len();

    // Smart threshold-based dispatching: skip the pool for small arrays
    if len < PARALLEL_THRESHOLD_REDUCE {
        return Ok(reduce_min_range(values, 0));
    }

    let ranges = partition::partition(len, rayon::current_num_threads());
    let partials = partition::run_parallel(ranges, |r| {
        reduce_min_range(&values[r.start..r.end], r.start)
    });
    partition::merge_partials(partials, merge_min)
}

/// Compute mean and standard deviation with the serial baseline.
///
/// A scalar pass over every element accumulating sum and sum-of-squares in
/// f64, then `mean = sum/N` and `stddev = sqrt(sumSq/N - mean^2)` with the
/// radicand clamped to zero if rounding pushes it negative.
///
/// # Arguments
/// * `values` - Input array of f32 values
///
/// # Returns
/// * `Ok(MeanStd)` - Mean and population standard deviation
/// * `Err(ParxError::EmptyInput)` - If the array is empty
#[inline]
pub fn reduce_mean_std_f32(values: &[f32]) -> Result<MeanStd> {
    trace!("REDUCE_MEAN_STD_F32 DISPATCH: values.len()={}", values.len());

    if values.is_empty() {
        return Err(ParxError::EmptyInput(
            "reduce_mean_std_f32 requires at least one element".to_string(),
        ));
    }

    let sums = reduce::sum_sumsq_f32_scalar(values);
    Ok(mean_std_from_sums(sums, values.len()))
}

/// Compute mean and standard deviation with the parallel variant.
///
/// Per-worker SIMD accumulation of `(sum, sumOfSquares)` partials in f64,
/// merged by addition after the barrier. Floating-point addition is not
/// associative, so the result may differ from [`reduce_mean_std_f32`] in the
/// last bits; agreement within 1e-4 relative is guaranteed for finite input.
#[inline]
pub fn parallel_reduce_mean_std_f32(values: &[f32]) -> Result<MeanStd> {
    trace!(
        "PARALLEL_REDUCE_MEAN_STD_F32 DISPATCH: values.len()={}",
        values.len()
    );

    if values.is_empty() {
        return Err(ParxError::EmptyInput(
            "parallel_reduce_mean_std_f32 requires at least one element".to_string(),
        ));
    }

    let len = values.len();

    // Smart threshold-based dispatching: skip the pool for small arrays
    if len < PARALLEL_THRESHOLD_REDUCE {
        let sums = sum_sumsq_range(values);
        return Ok(mean_std_from_sums(sums, len));
    }

    let ranges = partition::partition(len, rayon::current_num_threads());
    let partials = partition::run_parallel(ranges, |r| sum_sumsq_range(&values[r.start..r.end]));
    let sums = partition::merge_partials(partials, SumPartial::merge)?;
    Ok(mean_std_from_sums(sums, len))
}

/// Lowest-index tie-break merge for min partials: a candidate replaces the
/// best only on a strictly smaller value, or on an equal value at a strictly
/// lower index.
#[inline]
fn merge_min(best: MinResult, candidate: MinResult) -> MinResult {
    if candidate.value < best.value
        || (candidate.value == best.value && candidate.index < best.index)
    {
        candidate
    } else {
        best
    }
}

// Single-worker min-with-index over one sub-range; indices are rebased so
// partials carry provenance into the merge.
fn reduce_min_range(values: &[f32], base: usize) -> MinResult {
    let len = values.len();

    // Smart threshold-based dispatching: use scalar for small ranges
    if len < SIMD_THRESHOLD_REDUCE {
        let local = reduce::reduce_min_f32_scalar(values);
        return MinResult::new(local.value, local.index + base);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if get_hw_capabilities().has_avx2 {
            let local = unsafe { reduce::reduce_min_f32_avx2(values, len) };
            return MinResult::new(local.value, local.index + base);
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if get_hw_capabilities().has_neon {
            let local = unsafe { reduce::reduce_min_f32_neon(values, len) };
            return MinResult::new(local.value, local.index + base);
        }
    }

    // Scalar fallback when no SIMD tier is available
    let local = reduce::reduce_min_f32_scalar(values);
    MinResult::new(local.value, local.index + base)
}

// Single-worker sum/sum-of-squares over one sub-range.
fn sum_sumsq_range(values: &[f32]) -> SumPartial {
    let len = values.len();

    // Smart threshold-based dispatching: use scalar for small ranges
    if len < SIMD_THRESHOLD_REDUCE {
        return reduce::sum_sumsq_f32_scalar(values);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if get_hw_capabilities().has_avx2 {
            return unsafe { reduce::sum_sumsq_f32_avx2(values, len) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if get_hw_capabilities().has_neon {
            return unsafe { reduce::sum_sumsq_f32_neon(values, len) };
        }
    }

    // Scalar fallback when no SIMD tier is available
    reduce::sum_sumsq_f32_scalar(values)
}

fn mean_std_from_sums(sums: SumPartial, len: usize) -> MeanStd {
    let n = len as f64;
    let mean = sums.sum / n;
    // Rounding can push the radicand slightly negative; clamp before the root
    let radicand = (sums.sum_sq / n - mean * mean).max(0.0);
    MeanStd::new(mean, radicand.sqrt())
}

// =============================================================================
// ELEMENTWISE DISPATCH
// =============================================================================

/// Elementwise absolute difference of two u8 matrices, serial baseline.
///
/// `result[y][x] = |a[y][x] - b[y][x]|` via a plain scalar pass, row by row.
/// Operands must share the same shape and be non-empty.
///
/// # Examples
/// ```rust
/// use parx::types::Matrix;
/// use parx::abs_diff_matrix_u8;
/// let a = Matrix::from_fn(4, 2, |_, _| 200u8);
/// let b = Matrix::from_fn(4, 2, |_, _| 50u8);
/// let diff = abs_diff_matrix_u8(&a, &b)?;
/// assert!(diff.as_slice().iter().all(|&v| v == 150));
/// # Ok::<(), parx::types::ParxError>(())
/// ```
#[inline]
pub fn abs_diff_matrix_u8(a: &Matrix<u8>, b: &Matrix<u8>) -> Result<Matrix<u8>> {
    trace!(
        "ABS_DIFF_MATRIX_U8 DISPATCH: {}x{}",
        a.width(),
        a.height()
    );
    validate_map_operands(a, b, "abs_diff_matrix_u8")?;

    let mut out = Matrix::new(a.width(), a.height());
    for y in 0..a.height() {
        map::abs_diff_u8_scalar(a.row(y), b.row(y), out.row_mut(y));
    }
    Ok(out)
}

/// Elementwise absolute difference of two u8 matrices, parallel variant.
///
/// Rows are distributed across the worker pool; within a row the SIMD kernel
/// processes full lane groups with a scalar tail for remainder columns. Each
/// output row is written by exactly one worker, so no merge step exists.
/// Results are cell-exact against [`abs_diff_matrix_u8`].
#[inline]
pub fn parallel_abs_diff_matrix_u8(a: &Matrix<u8>, b: &Matrix<u8>) -> Result<Matrix<u8>> {
    trace!(
        "PARALLEL_ABS_DIFF_MATRIX_U8 DISPATCH: {}x{}",
        a.width(),
        a.height()
    );
    validate_map_operands(a, b, "parallel_abs_diff_matrix_u8")?;

    let mut out = Matrix::new(a.width(), a.height());

    // Smart threshold-based dispatching: skip the pool for small frames
    if a.cell_count() < PARALLEL_THRESHOLD_MAP {
        for y in 0..a.height() {
            abs_diff_row_u8(a.row(y), b.row(y), out.row_mut(y));
        }
        return Ok(out);
    }

    partition::for_each_row_pair(&mut out, a, b, |out_row, a_row, b_row| {
        abs_diff_row_u8(a_row, b_row, out_row)
    });
    Ok(out)
}

/// Elementwise alpha blend of two f32 matrices, serial baseline.
///
/// `result[y][x] = alpha*b[y][x] + (1-alpha)*a[y][x]` via a plain scalar
/// pass. Operands must share the same shape and be non-empty; `alpha` must
/// lie in `[0, 1]`.
///
/// At `alpha = 0` the result equals `a` exactly; at `alpha = 1` it equals
/// `b` exactly.
#[inline]
pub fn blend_matrix_f32(a: &Matrix<f32>, b: &Matrix<f32>, alpha: f32) -> Result<Matrix<f32>> {
    trace!(
        "BLEND_MATRIX_F32 DISPATCH: {}x{}, alpha={}",
        a.width(),
        a.height(),
        alpha
    );
    validate_map_operands(a, b, "blend_matrix_f32")?;
    validate_alpha(alpha)?;

    let mut out = Matrix::new(a.width(), a.height());
    for y in 0..a.height() {
        map::blend_f32_scalar(a.row(y), b.row(y), alpha, out.row_mut(y));
    }
    Ok(out)
}

/// Elementwise alpha blend of two f32 matrices, parallel variant.
///
/// Same row-parallel shape as [`parallel_abs_diff_matrix_u8`]. Agrees with
/// [`blend_matrix_f32`] within 1e-5 relative per cell; the boundary cases
/// `alpha = 0` and `alpha = 1` are exact in both variants.
#[inline]
pub fn parallel_blend_matrix_f32(
    a: &Matrix<f32>,
    b: &Matrix<f32>,
    alpha: f32,
) -> Result<Matrix<f32>> {
    trace!(
        "PARALLEL_BLEND_MATRIX_F32 DISPATCH: {}x{}, alpha={}",
        a.width(),
        a.height(),
        alpha
    );
    validate_map_operands(a, b, "parallel_blend_matrix_f32")?;
    validate_alpha(alpha)?;

    let mut out = Matrix::new(a.width(), a.height());

    // Smart threshold-based dispatching: skip the pool for small frames
    if a.cell_count() < PARALLEL_THRESHOLD_MAP {
        for y in 0..a.height() {
            blend_row_f32(a.row(y), b.row(y), alpha, out.row_mut(y));
        }
        return Ok(out);
    }

    partition::for_each_row_pair(&mut out, a, b, |out_row, a_row, b_row| {
        blend_row_f32(a_row, b_row, alpha, out_row)
    });
    Ok(out)
}

// Single-row u8 absolute difference with threshold and capability routing.
fn abs_diff_row_u8(a: &[u8], b: &[u8], out: &mut [u8]) {
    let len = out.len();

    if len < SIMD_THRESHOLD_MAP {
        return map::abs_diff_u8_scalar(a, b, out);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if get_hw_capabilities().has_avx2 {
            return unsafe { map::abs_diff_u8_avx2(a, b, out, len) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if get_hw_capabilities().has_neon {
            return unsafe { map::abs_diff_u8_neon(a, b, out, len) };
        }
    }

    map::abs_diff_u8_scalar(a, b, out)
}

// Single-row f32 alpha blend with threshold and capability routing.
fn blend_row_f32(a: &[f32], b: &[f32], alpha: f32, out: &mut [f32]) {
    let len = out.len();

    if len < SIMD_THRESHOLD_MAP {
        return map::blend_f32_scalar(a, b, alpha, out);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if get_hw_capabilities().has_avx2 {
            return unsafe { map::blend_f32_avx2(a, b, alpha, out, len) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if get_hw_capabilities().has_neon {
            return unsafe { map::blend_f32_neon(a, b, alpha, out, len) };
        }
    }

    map::blend_f32_scalar(a, b, alpha, out)
}

// Shared operand validation for the elementwise kernels: shapes must match
// and the frame must contain at least one cell, checked before any compute.
fn validate_map_operands<T>(a: &Matrix<T>, b: &Matrix<T>, op: &str) -> Result<()> {
    if !a.same_shape(b) {
        return Err(ParxError::DimensionMismatch(format!(
            "{}: a is {}x{}, b is {}x{}",
            op,
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    if a.cell_count() == 0 {
        return Err(ParxError::EmptyInput(format!(
            "{} requires a non-empty matrix",
            op
        )));
    }
    Ok(())
}

fn validate_alpha(alpha: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(ParxError::InvalidParameter(format!(
            "alpha must lie in [0, 1], got {}",
            alpha
        )));
    }
    Ok(())
}
