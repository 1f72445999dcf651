// SPDX-License-Identifier: Apache-2.0

//! parx library
//!
//! Data-parallel kernels with serial baselines, built for benchmarking one
//! against the other. Every kernel ships in two flavors: a plain scalar
//! reference pass, and a parallel variant that partitions the input across a
//! worker pool and runs SIMD within each worker.
//!
//! - Minimum-with-index search over f32 buffers
//! - Mean / standard deviation over f32 buffers
//! - Elementwise absolute difference over u8 matrices
//! - Elementwise alpha blend over f32 matrices
//!
//! ## Hardware support
//! - **AVX2 / NEON** are used on stable Rust where available
//! - Scalar fallbacks cover every kernel; the `disable-simd` feature forces
//!   them for A/B comparisons
//!
//! ## Usage
//!
//! ```rust
//! use parx;
//!
//! // Minimum with index: serial baseline vs parallel variant
//! let values = vec![5.0_f32, 2.0, 7.0, 2.0];
//! let serial = parx::reduce_min_f32(&values).unwrap();
//! let parallel = parx::parallel_reduce_min_f32(&values).unwrap();
//! assert_eq!(serial, parallel);
//! assert_eq!(serial.index, 1);
//!
//! // Check available SIMD capabilities
//! let caps = parx::get_hw_capabilities();
//! println!("Has AVX2: {}", caps.has_avx2);
//! ```

#![allow(clippy::missing_safety_doc)]

pub mod constants;
pub mod dispatch;
pub mod map;
pub mod partition;
pub mod reduce;
pub mod types;

pub use types::*;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
#[path = "tests/partition_tests.rs"]
mod partition_tests;
#[cfg(test)]
#[path = "tests/reduce_tests.rs"]
mod reduce_tests;
#[cfg(test)]
#[path = "tests/map_tests.rs"]
mod map_tests;
#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod dispatch_tests;

// Re-export the main API from core
pub use dispatch::*;
