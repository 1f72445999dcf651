// SPDX-License-Identifier: Apache-2.0

//! Partition scheduler: splits index ranges across the worker pool and
//! orchestrates fork-join execution plus the post-barrier merge.
//!
//! Reductions run through [`partition`] / [`run_parallel`] /
//! [`merge_partials`]: each worker produces one partial result over its
//! contiguous sub-range, and the partials are folded sequentially after all
//! workers have rejoined. No state is shared during the parallel phase.
//! Elementwise kernels run through [`for_each_row_pair`], which hands each
//! output row to exactly one worker as an exclusive mutable slice.

use std::ops::Range;

use rayon::prelude::*;

use crate::types::{Matrix, ParxError, Result};

// =============================================================================
// RANGE PARTITIONING
// =============================================================================

/// Splits `[0, len)` into at most `workers` contiguous disjoint ranges.
///
/// Ranges cover the interval exactly (no gaps, no overlaps) and their sizes
/// differ by at most one element. Fewer than `workers` ranges are returned
/// when `len < workers`; an empty interval yields no ranges.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let worker_count = workers.clamp(1, len);
    let base = len / worker_count;
    let remainder = len % worker_count;

    let mut ranges = Vec::with_capacity(worker_count);
    let mut start = 0;
    for i in 0..worker_count {
        let size = base + usize::from(i < remainder);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Splits `[0, len)` into lane-aligned worker ranges plus a scalar tail.
///
/// Every returned range starts and ends on a multiple of `lane_width`, so a
/// vectorized sub-loop over a range only touches lane-aligned positions. The
/// remainder `[len - len % lane_width, len)` comes back as the tail range and
/// is processed by a scalar pass after the parallel phase. Ranges plus tail
/// cover `[0, len)` exactly.
pub fn partition_aligned(
    len: usize,
    workers: usize,
    lane_width: usize,
) -> (Vec<Range<usize>>, Range<usize>) {
    debug_assert!(lane_width > 0, "lane width must be non-zero");
    let aligned_len = len - len % lane_width;
    let lane_groups = aligned_len / lane_width;

    let ranges = partition(lane_groups, workers)
        .into_iter()
        .map(|r| r.start * lane_width..r.end * lane_width)
        .collect();
    (ranges, aligned_len..len)
}

// =============================================================================
// PARALLEL EXECUTION
// =============================================================================

/// Executes `worker` over every range on the global worker pool.
///
/// Blocks until all workers complete (full barrier, no early cancellation)
/// and returns their partial results in range order.
pub fn run_parallel<P, F>(ranges: Vec<Range<usize>>, worker: F) -> Vec<P>
where
    P: Send,
    F: Fn(Range<usize>) -> P + Sync + Send,
{
    ranges.into_par_iter().map(worker).collect()
}

/// Applies `row_op` to every `(out, a, b)` row triple in parallel.
///
/// Rows are distributed across the worker pool; each output row is written
/// by exactly one worker. Callers must have validated that all three
/// matrices share the same shape and that `width > 0`.
pub fn for_each_row_pair<T, F>(out: &mut Matrix<T>, a: &Matrix<T>, b: &Matrix<T>, row_op: F)
where
    T: Send + Sync,
    F: Fn(&mut [T], &[T], &[T]) + Sync + Send,
{
    let width = out.width();
    out.as_mut_slice()
        .par_chunks_mut(width)
        .zip(a.as_slice().par_chunks(width))
        .zip(b.as_slice().par_chunks(width))
        .for_each(|((out_row, a_row), b_row)| row_op(out_row, a_row, b_row));
}

// =============================================================================
// MERGE
// =============================================================================

/// Folds per-worker partial results into a single value.
///
/// Partials arrive in range order regardless of which worker finished first,
/// and the fold runs left to right, so a tie between two ranges resolves
/// toward the lower range. The reduction kernels combine with numeric min
/// plus a lowest-index tie-break, or with plain addition for sums.
pub fn merge_partials<P>(partials: Vec<P>, combine: impl Fn(P, P) -> P) -> Result<P> {
    let mut iter = partials.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| ParxError::Internal("No partial results to merge".to_string()))?;
    Ok(iter.fold(first, combine))
}
