//! Row partitioning and the two-pass generation protocol.
//!
//! Rows are split into contiguous chunks, one per worker. Each generation:
//! 1. `next` is overwritten with `current`.
//! 2. Edge pass: the first and last row of every chunk are updated one at a
//!    time on the calling thread. Their footprints reach into the adjacent
//!    chunk (and across the wrap), so they never run concurrently.
//! 3. Interior pass: one task per chunk updates the rows strictly between its
//!    edges. An interior row's footprint is rows `r-1..=r+1`, all inside the
//!    chunk, so no two tasks write the same cell.

use std::ops::Range;

use rayon::prelude::*;
use tracing::debug;

use super::cell::Cell;
use super::row::{RowBand, update_row};
use super::torus::Torus;

struct SendPtr<T> {
    inner: *mut T,
}
unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}
impl<T> Copy for SendPtr<T> {}
impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> SendPtr<T> {
    #[inline(always)]
    fn new(ptr: *mut T) -> Self {
        Self { inner: ptr }
    }
    #[inline(always)]
    fn get(&self) -> *mut T {
        self.inner
    }
}

/// A contiguous, inclusive range of rows owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowChunk {
    pub first: usize,
    pub last: usize,
}

impl RowChunk {
    #[inline]
    pub fn rows(&self) -> usize {
        self.last - self.first + 1
    }

    /// Rows strictly between the two edge rows; empty for chunks of 1 or 2.
    #[inline]
    pub fn interior(&self) -> Range<usize> {
        (self.first + 1)..self.last.max(self.first + 1)
    }

    #[inline]
    pub fn has_distinct_edges(&self) -> bool {
        self.last != self.first
    }
}

/// Split `0..nrows` into `min(thread_count, nrows)` chunks of `nrows / n`
/// rows, the last chunk taking the remainder.
pub fn partition_rows(nrows: usize, thread_count: usize) -> Vec<RowChunk> {
    assert!(nrows > 0, "cannot partition an empty board");
    let count = thread_count.clamp(1, nrows);
    let size = nrows / count;
    (0..count)
        .map(|i| RowChunk {
            first: i * size,
            last: if i + 1 == count {
                nrows - 1
            } else {
                (i + 1) * size - 1
            },
        })
        .collect()
}

/// Advances a board by one generation using a fixed row partition.
pub struct GenerationScheduler {
    torus: Torus,
    chunks: Vec<RowChunk>,
}

impl GenerationScheduler {
    pub fn new(torus: Torus, thread_count: usize) -> Self {
        let chunks = partition_rows(torus.nrows(), thread_count);
        debug!(
            nrows = torus.nrows(),
            chunks = chunks.len(),
            chunk_rows = chunks[0].rows(),
            last_chunk_rows = chunks[chunks.len() - 1].rows(),
            "row partition"
        );
        Self { torus, chunks }
    }

    #[inline]
    pub fn torus(&self) -> Torus {
        self.torus
    }

    #[inline]
    pub fn chunks(&self) -> &[RowChunk] {
        &self.chunks
    }

    /// Compute the generation after `current` into `next`. The interior pass
    /// runs on whichever rayon pool the caller is installed in.
    ///
    /// Returns the number of cells that changed state.
    pub fn advance(&self, current: &[Cell], next: &mut [Cell]) -> usize {
        let torus = self.torus;
        assert_eq!(current.len(), torus.cell_count());
        assert_eq!(next.len(), torus.cell_count());

        next.copy_from_slice(current);

        let mut changed = 0;
        for chunk in &self.chunks {
            changed += update_row(chunk.first, current, next, torus);
            if chunk.has_distinct_edges() {
                changed += update_row(chunk.last, current, next, torus);
            }
        }

        let next_ptr = SendPtr::new(next.as_mut_ptr());
        changed += self
            .chunks
            .par_iter()
            .map(|chunk| {
                let interior = chunk.interior();
                if interior.is_empty() {
                    return 0;
                }
                // SAFETY: `next` is not touched through any other path until
                // this pass joins, and chunks are pairwise disjoint row ranges.
                // Interior rows of `chunk` only write rows `first..=last`.
                let mut band =
                    unsafe { RowBand::new(next_ptr.get(), torus, chunk.first..=chunk.last) };
                interior
                    .map(|row| update_row(row, current, &mut band, torus))
                    .sum::<usize>()
            })
            .sum::<usize>();

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{GenerationScheduler, RowChunk, partition_rows};
    use crate::rowlife::board::{Board, count_mismatch};

    fn assert_exact_cover(chunks: &[RowChunk], nrows: usize) {
        assert_eq!(chunks[0].first, 0);
        assert_eq!(chunks[chunks.len() - 1].last, nrows - 1);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].last + 1, pair[1].first);
        }
        for chunk in chunks {
            assert!(chunk.first <= chunk.last);
        }
    }

    #[test]
    fn partition_covers_rows_exactly() {
        for nrows in 1..=40 {
            for threads in 1..=12 {
                let chunks = partition_rows(nrows, threads);
                assert_eq!(chunks.len(), threads.min(nrows), "nrows={nrows} threads={threads}");
                assert_exact_cover(&chunks, nrows);
            }
        }
    }

    #[test]
    fn last_chunk_takes_remainder() {
        let chunks = partition_rows(10, 3);
        assert_eq!(
            chunks,
            vec![
                RowChunk { first: 0, last: 2 },
                RowChunk { first: 3, last: 5 },
                RowChunk { first: 6, last: 9 },
            ]
        );
    }

    #[test]
    fn interior_excludes_edges() {
        assert_eq!(RowChunk { first: 4, last: 4 }.interior(), 5..5);
        assert!(RowChunk { first: 4, last: 5 }.interior().is_empty());
        assert_eq!(RowChunk { first: 4, last: 8 }.interior(), 5..8);
    }

    #[test]
    fn advance_keeps_counts_exact() {
        let alive = [(0, 0), (0, 1), (0, 2), (5, 5), (6, 6), (7, 4), (7, 5), (7, 6), (11, 3)];
        let board = Board::from_alive(12, 9, alive).unwrap();
        let torus = board.torus();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        let scheduler = GenerationScheduler::new(torus, 4);
        let mut current = board.into_cells();
        let mut next = current.clone();
        pool.install(|| {
            for _ in 0..20 {
                scheduler.advance(&current, &mut next);
                std::mem::swap(&mut current, &mut next);
                assert_eq!(count_mismatch(torus, &current), None);
            }
        });
    }

    #[test]
    fn more_threads_than_rows_collapses_chunks() {
        let board = Board::from_alive(3, 6, [(1, 1), (1, 2), (1, 3)]).unwrap();
        let torus = board.torus();
        let scheduler = GenerationScheduler::new(torus, 16);
        assert_eq!(scheduler.chunks().len(), 3);
        let current = board.into_cells();
        let mut next = current.clone();
        let changed = scheduler.advance(&current, &mut next);
        assert!(changed > 0);
        assert_eq!(count_mismatch(torus, &next), None);
    }
}
