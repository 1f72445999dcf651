// SPDX-License-Identifier: Apache-2.0

// types.rs for parx
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParxError {
    #[error("Empty input: {0}")]
    EmptyInput(String),
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ParxError>;

/// Minimum value and the position where it first occurs.
///
/// When several elements tie for the minimum, `index` is always the lowest
/// position, matching a strict left-to-right scan with `<` updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinResult {
    pub value: f32,
    pub index: usize,
}

impl MinResult {
    #[inline]
    pub fn new(value: f32, index: usize) -> Self {
        Self { value, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanStd {
    pub mean: f64,
    pub std_dev: f64,
}

impl MeanStd {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

/// Per-worker accumulation state for the mean/standard-deviation reduction.
///
/// Sums are carried in `f64` even though the input is `f32`; worker partials
/// merge by plain addition after the fork-join barrier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SumPartial {
    pub sum: f64,
    pub sum_sq: f64,
}

impl SumPartial {
    #[inline]
    pub fn new(sum: f64, sum_sq: f64) -> Self {
        Self { sum, sum_sq }
    }

    #[inline]
    pub fn merge(self, other: SumPartial) -> SumPartial {
        SumPartial {
            sum: self.sum + other.sum,
            sum_sq: self.sum_sq + other.sum_sq,
        }
    }
}

/// A 2D buffer stored as a single contiguous row-major allocation.
///
/// Every row is a disjoint sub-slice of length `width`; kernels hand rows to
/// workers as exclusive mutable slices, so no aliasing is possible between
/// rows. Construction validates that the backing length equals
/// `width * height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy + Default> Matrix<T> {
    /// Creates a `width x height` matrix filled with `T::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![T::default(); width * height],
            width,
            height,
        }
    }

    /// Creates a matrix by evaluating `f(x, y)` for every cell in row-major
    /// order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }
}

impl<T> Matrix<T> {
    /// Wraps an existing row-major buffer.
    pub fn from_vec(data: Vec<T>, width: usize, height: usize) -> Result<Self> {
        if data.len() != width * height {
            return Err(ParxError::DimensionMismatch(format!(
                "Buffer of length {} cannot back a {}x{} matrix",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells (`width * height`).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[y * self.width + x]
    }

    /// True when `other` has the same width and height.
    #[inline]
    pub fn same_shape<U>(&self, other: &Matrix<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl Matrix<u8> {
    /// Sum of all cells, used by the drivers to compare variants cheaply.
    pub fn checksum(&self) -> u64 {
        self.data.iter().map(|&v| v as u64).sum()
    }
}

impl Matrix<f32> {
    /// Sum of all cells in `f64`, used by the drivers to compare variants.
    pub fn checksum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }
}

/// One timed serial-vs-parallel comparison, as reported by the benchmark
/// drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    pub kernel: String,
    pub serial_ms: f64,
    pub parallel_ms: f64,
    pub speedup: f64,
}

impl BenchReport {
    pub fn new(kernel: impl Into<String>, serial_ms: f64, parallel_ms: f64) -> Self {
        let speedup = if parallel_ms > 0.0 {
            serial_ms / parallel_ms
        } else {
            f64::INFINITY
        };
        Self {
            kernel: kernel.into(),
            serial_ms,
            parallel_ms,
            speedup,
        }
    }
}
