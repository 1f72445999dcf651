// SPDX-License-Identifier: Apache-2.0

//! Common constants used across implementations
//!
//! This module centralizes lane counts, dispatch thresholds, and benchmark
//! defaults used by the scalar/SIMD/parallel paths.

// =============================================================================
// SIMD Lane Counts by Architecture
// =============================================================================

// x86/x86_64 Stable Constants (AVX2)
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use x86_stable_constants::*;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86_stable_constants {
    // AVX2 (256-bit registers)
    pub const LANES_AVX2_F32: usize = 8; // 256/32 = 8 f32 elements
    pub const LANES_AVX2_BYTES: usize = 32; // 256/8 = 32 byte elements
}

// NEON Constants (ARM64 only)
#[cfg(target_arch = "aarch64")]
pub use neon_constants::*;
#[cfg(target_arch = "aarch64")]
mod neon_constants {
    pub const LANES_NEON_F32: usize = 4; // 128/32 = 4 f32 elements
    pub const LANES_NEON_BYTES: usize = 16; // 128/8 = 16 byte elements
}

// =============================================================================
// SIMD Performance Thresholds
// =============================================================================

// When disable-simd feature is enabled, set all thresholds to usize::MAX to force scalar implementations
#[cfg(feature = "disable-simd")]
mod thresholds {
    // Reduction Operations Thresholds
    pub const SIMD_THRESHOLD_REDUCE: usize = usize::MAX; // Min-with-index, sum/sum-of-squares

    // Elementwise Operations Thresholds
    pub const SIMD_THRESHOLD_MAP: usize = usize::MAX; // Per-row abs-diff, blend
}

// Normal thresholds when SIMD is enabled (default)
#[cfg(not(feature = "disable-simd"))]
mod thresholds {
    // Reduction Operations Thresholds
    pub const SIMD_THRESHOLD_REDUCE: usize = 32; // Min-with-index, sum/sum-of-squares

    // Elementwise Operations Thresholds
    pub const SIMD_THRESHOLD_MAP: usize = 16; // Per-row abs-diff, blend
}

// Re-export the thresholds at the module level
pub use thresholds::*;

// =============================================================================
// Parallel Dispatch Thresholds
// =============================================================================

// Below these sizes the fork-join overhead outweighs the work, so the
// parallel entry points run the single-threaded kernel instead.
pub const PARALLEL_THRESHOLD_REDUCE: usize = 8192; // Elements per reduction
pub const PARALLEL_THRESHOLD_MAP: usize = 16384; // Total cells per elementwise map

// =============================================================================
// Benchmark Defaults
// =============================================================================

pub const DEFAULT_VECTOR_LEN: usize = 1 << 20; // 1,048,576 elements
pub const DEFAULT_FRAME_WIDTH: usize = 640;
pub const DEFAULT_FRAME_HEIGHT: usize = 480;
pub const DEFAULT_BLEND_ALPHA: f32 = 0.4;
pub const DEFAULT_WARMUP_ITERATIONS: usize = 3;
pub const DEFAULT_TIMED_ITERATIONS: usize = 10;

// =============================================================================
// Validation Tolerances
// =============================================================================

pub const RELATIVE_TOLERANCE_MEAN_STD: f64 = 1e-4; // Serial vs parallel statistics
pub const RELATIVE_TOLERANCE_BLEND: f32 = 1e-5; // Serial vs parallel blend cells
