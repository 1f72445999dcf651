// SPDX-License-Identifier: Apache-2.0

//! Reduction kernels
//!
//! Minimum-with-index and sum/sum-of-squares kernels with scalar and SIMD
//! variants. Each SIMD variant processes one contiguous slice (a worker's
//! sub-range) and returns a partial result local to that slice; the dispatch
//! layer rebases indices and merges partials.
//!
//! ## Performance notes
//! Kernels are written in a performance-oriented style (tight loops, minimal
//! abstraction). When modifying hot paths, prefer changes that keep
//! allocations out of inner loops.

// Some clippy lints are noisy for low-level SIMD code; we opt out at the module level.
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::needless_range_loop)]

// Import architecture-specific constants directly - NO FUNCTION CALLS IN SIMD KERNELS!
use super::constants::*;
use crate::types::{MinResult, SumPartial};

// ARM NEON imports
#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::{
  vaddq_f64, vaddq_u32, vbslq_f32, vbslq_u32, vcltq_f32, vcvt_f64_f32, vcvt_high_f64_f32,
  vdupq_n_f32, vdupq_n_f64, vdupq_n_u32, vfmaq_f64, vget_low_f32, vgetq_lane_f64, vld1q_f32,
  vld1q_u32, vst1q_f32, vst1q_u32,
};

// x86_64 SIMD intrinsics imports - AVX2
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use std::arch::x86_64::{
  __m256i,
  _CMP_LT_OQ,
  // Still needed SSE2 intrinsics for horizontal reductions
  _mm_add_pd,
  _mm_cvtsd_f64,
  // AVX2 intrinsics
  _mm256_add_epi32,
  _mm256_add_pd,
  _mm256_blendv_epi8,
  _mm256_blendv_ps,
  _mm256_castpd256_pd128,
  _mm256_castps256_ps128,
  _mm256_castps_si256,
  _mm256_cmp_ps,
  _mm256_cvtps_pd,
  _mm256_extractf128_pd,
  _mm256_extractf128_ps,
  _mm256_hadd_pd,
  _mm256_loadu_ps,
  _mm256_mul_pd,
  _mm256_set1_epi32,
  _mm256_set1_ps,
  _mm256_setr_epi32,
  _mm256_setzero_pd,
  _mm256_setzero_si256,
  _mm256_storeu_ps,
  _mm256_storeu_si256,
};

// =============================================================================
// MINIMUM-WITH-INDEX OPERATIONS
// =============================================================================

// Scalar minimum-with-index: a single left-to-right scan with strict `<`
// updates, so the first occurrence of the minimum wins. NaN compares false
// and is never selected.
pub(crate) fn reduce_min_f32_scalar(values: &[f32]) -> MinResult {
  let mut best = MinResult::new(f32::INFINITY, 0);
  for (i, &val) in values.iter().enumerate() {
    if val < best.value {
      best = MinResult::new(val, i);
    }
  }
  best
}

// AVX2 optimized f32 min-with-index reduction.
//
// Tracks a running minimum and its element index per lane; lanes are reduced
// at the end with a lowest-index tie-break so duplicate minima resolve the
// same way the scalar scan does.
//
// # Safety
// Requires AVX2 support. Slices longer than i32::MAX elements are not
// supported; the dispatch layer partitions buffers well below that.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn reduce_min_f32_avx2(values: &[f32], len: usize) -> MinResult {
  const LANES: usize = LANES_AVX2_F32; // AVX2 processes 8 f32 values at once
  debug_assert!(len <= i32::MAX as usize);

  let mut min_vec = _mm256_set1_ps(f32::INFINITY);
  let mut idx_vec = _mm256_setzero_si256();
  // Element indices currently sitting in each lane
  let mut cur_idx = _mm256_setr_epi32(0, 1, 2, 3, 4, 5, 6, 7);
  let idx_step = _mm256_set1_epi32(LANES as i32);

  // Process complete SIMD chunks (matching NEON structure)
  let full_chunks = len / LANES;
  let remaining_elements = len % LANES;

  // Process 8-element chunks with AVX2 (matching NEON for-loop structure)
  for chunk_idx in 0..full_chunks {
    let offset = chunk_idx * LANES;
    let values_chunk = _mm256_loadu_ps(values.as_ptr().add(offset));

    // Ordered strict less-than: false for NaN lanes, so NaN never updates
    let lt_mask = _mm256_cmp_ps(values_chunk, min_vec, _CMP_LT_OQ);
    min_vec = _mm256_blendv_ps(min_vec, values_chunk, lt_mask);
    idx_vec = _mm256_blendv_epi8(idx_vec, cur_idx, _mm256_castps_si256(lt_mask));
    cur_idx = _mm256_add_epi32(cur_idx, idx_step);
  }

  // Extract lanes and reduce with the lowest-index tie-break. Within a lane
  // indices only grow, so each lane already holds its earliest minimum.
  let mut lane_vals = [0.0f32; LANES];
  let mut lane_idxs = [0i32; LANES];
  _mm256_storeu_ps(lane_vals.as_mut_ptr(), min_vec);
  _mm256_storeu_si256(lane_idxs.as_mut_ptr() as *mut __m256i, idx_vec);

  let mut best = MinResult::new(f32::INFINITY, 0);
  for lane in 0..LANES {
    let val = lane_vals[lane];
    let idx = lane_idxs[lane] as usize;
    if val < best.value || (val == best.value && idx < best.index) {
      best = MinResult::new(val, idx);
    }
  }

  // Handle remaining elements with scalar comparison (matching NEON structure)
  let offset = full_chunks * LANES;
  for j in 0..remaining_elements {
    let val = values[offset + j];
    if val < best.value {
      best = MinResult::new(val, offset + j);
    }
  }

  best
}

// NEON optimized f32 min-with-index reduction.
//
// Same per-lane index tracking as the AVX2 variant, with `vbslq` selects
// driven by an ordered less-than mask.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) unsafe fn reduce_min_f32_neon(values: &[f32], len: usize) -> MinResult {
  const LANES: usize = LANES_NEON_F32; // NEON processes 4 f32 values at once
  debug_assert!(len <= u32::MAX as usize);

  let mut min_vec = vdupq_n_f32(f32::INFINITY);
  let mut idx_vec = vdupq_n_u32(0);
  let lane_offsets = [0u32, 1, 2, 3];
  let mut cur_idx = vld1q_u32(lane_offsets.as_ptr());
  let idx_step = vdupq_n_u32(LANES as u32);

  let full_chunks = len / LANES;
  let remaining_elements = len % LANES;

  // Process 4-element chunks with NEON
  for chunk_idx in 0..full_chunks {
    let offset = chunk_idx * LANES;
    let values_chunk = vld1q_f32(values.as_ptr().add(offset));

    // vcltq_f32 is an ordered compare: false for NaN lanes
    let lt_mask = vcltq_f32(values_chunk, min_vec);
    min_vec = vbslq_f32(lt_mask, values_chunk, min_vec);
    idx_vec = vbslq_u32(lt_mask, cur_idx, idx_vec);
    cur_idx = vaddq_u32(cur_idx, idx_step);
  }

  // Extract lanes and reduce with the lowest-index tie-break
  let mut lane_vals = [0.0f32; LANES];
  let mut lane_idxs = [0u32; LANES];
  vst1q_f32(lane_vals.as_mut_ptr(), min_vec);
  vst1q_u32(lane_idxs.as_mut_ptr(), idx_vec);

  let mut best = MinResult::new(f32::INFINITY, 0);
  for lane in 0..LANES {
    let val = lane_vals[lane];
    let idx = lane_idxs[lane] as usize;
    if val < best.value || (val == best.value && idx < best.index) {
      best = MinResult::new(val, idx);
    }
  }

  // Handle remaining elements with scalar comparison
  let offset = full_chunks * LANES;
  for j in 0..remaining_elements {
    let val = values[offset + j];
    if val < best.value {
      best = MinResult::new(val, offset + j);
    }
  }

  best
}

// =============================================================================
// SUM / SUM-OF-SQUARES OPERATIONS
// =============================================================================

// Scalar sum and sum-of-squares, accumulated in f64.
pub(crate) fn sum_sumsq_f32_scalar(values: &[f32]) -> SumPartial {
  let mut sum = 0.0f64;
  let mut sum_sq = 0.0f64;
  for &val in values {
    let v = val as f64;
    sum += v;
    sum_sq += v * v;
  }
  SumPartial::new(sum, sum_sq)
}

// AVX2 optimized f32 sum and sum-of-squares reduction.
//
// Each 8-lane f32 chunk is widened to two 4-lane f64 halves before
// accumulation, keeping the running sums in f64 like the scalar variant.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn sum_sumsq_f32_avx2(values: &[f32], len: usize) -> SumPartial {
  const LANES: usize = LANES_AVX2_F32; // AVX2 processes 8 f32 values at once

  let mut sum_vec = _mm256_setzero_pd();
  let mut sumsq_vec = _mm256_setzero_pd();

  // Process complete SIMD chunks (matching NEON structure)
  let full_chunks = len / LANES;
  let remaining_elements = len % LANES;

  for chunk_idx in 0..full_chunks {
    let offset = chunk_idx * LANES;
    let values_chunk = _mm256_loadu_ps(values.as_ptr().add(offset));

    // Widen to f64: low and high 128-bit halves separately
    let lo = _mm256_cvtps_pd(_mm256_castps256_ps128(values_chunk));
    let hi = _mm256_cvtps_pd(_mm256_extractf128_ps(values_chunk, 1));

    sum_vec = _mm256_add_pd(sum_vec, _mm256_add_pd(lo, hi));
    let sq = _mm256_add_pd(_mm256_mul_pd(lo, lo), _mm256_mul_pd(hi, hi));
    sumsq_vec = _mm256_add_pd(sumsq_vec, sq);
  }

  // Horizontal sum of the 4 elements in each vector
  // [a, b, c, d] -> [a+b, c+d, a+b, c+d]
  let sum_hadd = _mm256_hadd_pd(sum_vec, sum_vec);
  let sum_high = _mm256_extractf128_pd(sum_hadd, 1);
  let sum_128 = _mm_add_pd(_mm256_castpd256_pd128(sum_hadd), sum_high);
  let mut final_sum = _mm_cvtsd_f64(sum_128);

  let sumsq_hadd = _mm256_hadd_pd(sumsq_vec, sumsq_vec);
  let sumsq_high = _mm256_extractf128_pd(sumsq_hadd, 1);
  let sumsq_128 = _mm_add_pd(_mm256_castpd256_pd128(sumsq_hadd), sumsq_high);
  let mut final_sum_sq = _mm_cvtsd_f64(sumsq_128);

  // Handle remaining elements with scalar accumulation
  let offset = full_chunks * LANES;
  for j in 0..remaining_elements {
    let val = values[offset + j] as f64;
    final_sum += val;
    final_sum_sq += val * val;
  }

  SumPartial::new(final_sum, final_sum_sq)
}

// NEON optimized f32 sum and sum-of-squares reduction.
//
// Widens each 4-lane f32 chunk to two 2-lane f64 halves; squares accumulate
// through fused multiply-add.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) unsafe fn sum_sumsq_f32_neon(values: &[f32], len: usize) -> SumPartial {
  const LANES: usize = LANES_NEON_F32; // NEON processes 4 f32 values at once

  let mut sum_vec = vdupq_n_f64(0.0);
  let mut sumsq_vec = vdupq_n_f64(0.0);

  let full_chunks = len / LANES;
  let remaining_elements = len % LANES;

  for chunk_idx in 0..full_chunks {
    let offset = chunk_idx * LANES;
    let values_chunk = vld1q_f32(values.as_ptr().add(offset));

    // Widen to f64: low and high halves separately
    let lo = vcvt_f64_f32(vget_low_f32(values_chunk));
    let hi = vcvt_high_f64_f32(values_chunk);

    sum_vec = vaddq_f64(sum_vec, vaddq_f64(lo, hi));
    sumsq_vec = vfmaq_f64(sumsq_vec, lo, lo);
    sumsq_vec = vfmaq_f64(sumsq_vec, hi, hi);
  }

  // Extract and sum the 2 elements from each vector
  let mut final_sum = vgetq_lane_f64(sum_vec, 0) + vgetq_lane_f64(sum_vec, 1);
  let mut final_sum_sq = vgetq_lane_f64(sumsq_vec, 0) + vgetq_lane_f64(sumsq_vec, 1);

  // Handle remaining elements with scalar accumulation
  let offset = full_chunks * LANES;
  for j in 0..remaining_elements {
    let val = values[offset + j] as f64;
    final_sum += val;
    final_sum_sq += val * val;
  }

  SumPartial::new(final_sum, final_sum_sq)
}
