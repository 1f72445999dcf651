// SPDX-License-Identifier: Apache-2.0

//! Elementwise map kernels
//!
//! Absolute difference over `u8` rows and alpha blend over `f32` rows, with
//! scalar and SIMD variants. Each kernel processes one row (or any contiguous
//! slice); row-level parallelism is orchestrated by the partition scheduler,
//! so no function here touches more than the slices it is handed.

// Some clippy lints are noisy for low-level SIMD code; we opt out at the module level.
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::needless_range_loop)]

// Import architecture-specific constants directly - NO FUNCTION CALLS IN SIMD KERNELS!
use super::constants::*;

// ARM NEON imports
#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::{
  vabdq_u8, vdupq_n_f32, vfmaq_f32, vld1q_f32, vld1q_u8, vmulq_f32, vst1q_f32, vst1q_u8,
};

// x86_64 SIMD intrinsics imports - AVX2
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use std::arch::x86_64::{
  __m256i, _mm256_add_ps, _mm256_loadu_ps, _mm256_loadu_si256, _mm256_max_epu8, _mm256_mul_ps,
  _mm256_set1_ps, _mm256_storeu_ps, _mm256_storeu_si256, _mm256_subs_epu8,
};

// =============================================================================
// ELEMENTWISE ABSOLUTE DIFFERENCE OPERATIONS
// =============================================================================

// Scalar absolute difference over one row.
pub(crate) fn abs_diff_u8_scalar(a: &[u8], b: &[u8], out: &mut [u8]) {
  for i in 0..out.len() {
    out[i] = a[i].abs_diff(b[i]);
  }
}

// AVX2 optimized u8 absolute difference.
//
// |a - b| without sign handling: saturating subtraction in both directions,
// then the lane-wise max of the two results.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn abs_diff_u8_avx2(a: &[u8], b: &[u8], out: &mut [u8], len: usize) {
  const LANES: usize = LANES_AVX2_BYTES; // AVX2 processes 32 bytes at once

  // Process complete SIMD chunks (matching NEON structure)
  let full_chunks = len / LANES;
  let remaining_elements = len % LANES;

  for chunk_idx in 0..full_chunks {
    let offset = chunk_idx * LANES;
    let a_chunk = _mm256_loadu_si256(a.as_ptr().add(offset) as *const __m256i);
    let b_chunk = _mm256_loadu_si256(b.as_ptr().add(offset) as *const __m256i);

    let diff = _mm256_max_epu8(
      _mm256_subs_epu8(a_chunk, b_chunk),
      _mm256_subs_epu8(b_chunk, a_chunk),
    );
    _mm256_storeu_si256(out.as_mut_ptr().add(offset) as *mut __m256i, diff);
  }

  // Handle remaining elements with scalar subtraction
  let offset = full_chunks * LANES;
  for j in 0..remaining_elements {
    out[offset + j] = a[offset + j].abs_diff(b[offset + j]);
  }
}

// NEON optimized u8 absolute difference.
//
// NEON has a native absolute-difference instruction, so no
// subtract-both-ways dance is needed.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) unsafe fn abs_diff_u8_neon(a: &[u8], b: &[u8], out: &mut [u8], len: usize) {
  const LANES: usize = LANES_NEON_BYTES; // NEON processes 16 bytes at once

  let full_chunks = len / LANES;
  let remaining_elements = len % LANES;

  for chunk_idx in 0..full_chunks {
    let offset = chunk_idx * LANES;
    let a_chunk = vld1q_u8(a.as_ptr().add(offset));
    let b_chunk = vld1q_u8(b.as_ptr().add(offset));

    let diff = vabdq_u8(a_chunk, b_chunk);
    vst1q_u8(out.as_mut_ptr().add(offset), diff);
  }

  // Handle remaining elements with scalar subtraction
  let offset = full_chunks * LANES;
  for j in 0..remaining_elements {
    out[offset + j] = a[offset + j].abs_diff(b[offset + j]);
  }
}

// =============================================================================
// ELEMENTWISE ALPHA BLEND OPERATIONS
// =============================================================================

// Scalar alpha blend over one row: alpha*b + (1-alpha)*a per element.
pub(crate) fn blend_f32_scalar(a: &[f32], b: &[f32], alpha: f32, out: &mut [f32]) {
  let inv_alpha = 1.0 - alpha;
  for i in 0..out.len() {
    out[i] = alpha * b[i] + inv_alpha * a[i];
  }
}

// AVX2 optimized f32 alpha blend.
//
// alpha and 1-alpha are splatted once outside the loop; each chunk is two
// multiplies and an add.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn blend_f32_avx2(a: &[f32], b: &[f32], alpha: f32, out: &mut [f32], len: usize) {
  const LANES: usize = LANES_AVX2_F32; // AVX2 processes 8 f32 values at once

  let alpha_vec = _mm256_set1_ps(alpha);
  let inv_alpha_vec = _mm256_set1_ps(1.0 - alpha);

  let full_chunks = len / LANES;
  let remaining_elements = len % LANES;

  for chunk_idx in 0..full_chunks {
    let offset = chunk_idx * LANES;
    let a_chunk = _mm256_loadu_ps(a.as_ptr().add(offset));
    let b_chunk = _mm256_loadu_ps(b.as_ptr().add(offset));

    let blended = _mm256_add_ps(
      _mm256_mul_ps(b_chunk, alpha_vec),
      _mm256_mul_ps(a_chunk, inv_alpha_vec),
    );
    _mm256_storeu_ps(out.as_mut_ptr().add(offset), blended);
  }

  // Handle remaining elements with scalar blend
  let offset = full_chunks * LANES;
  let inv_alpha = 1.0 - alpha;
  for j in 0..remaining_elements {
    out[offset + j] = alpha * b[offset + j] + inv_alpha * a[offset + j];
  }
}

// NEON optimized f32 alpha blend.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) unsafe fn blend_f32_neon(a: &[f32], b: &[f32], alpha: f32, out: &mut [f32], len: usize) {
  const LANES: usize = LANES_NEON_F32; // NEON processes 4 f32 values at once

  let alpha_vec = vdupq_n_f32(alpha);
  let inv_alpha_vec = vdupq_n_f32(1.0 - alpha);

  let full_chunks = len / LANES;
  let remaining_elements = len % LANES;

  for chunk_idx in 0..full_chunks {
    let offset = chunk_idx * LANES;
    let a_chunk = vld1q_f32(a.as_ptr().add(offset));
    let b_chunk = vld1q_f32(b.as_ptr().add(offset));

    let blended = vfmaq_f32(vmulq_f32(a_chunk, inv_alpha_vec), b_chunk, alpha_vec);
    vst1q_f32(out.as_mut_ptr().add(offset), blended);
  }

  // Handle remaining elements with scalar blend
  let offset = full_chunks * LANES;
  let inv_alpha = 1.0 - alpha;
  for j in 0..remaining_elements {
    out[offset + j] = alpha * b[offset + j] + inv_alpha * a[offset + j];
  }
}
