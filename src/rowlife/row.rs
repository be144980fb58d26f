//! Per-row transition kernel.
//!
//! Decisions read only the previous generation (`current`); every write goes
//! to `next`, which starts the generation as a byte copy of `current`.

use std::marker::PhantomData;
use std::ops::RangeInclusive;

use super::cell::Cell;
use super::torus::Torus;

/// Mutable access to the `next` buffer, one cell at a time.
pub(crate) trait CellsMut {
    fn cell_mut(&mut self, index: usize) -> &mut Cell;
}

impl CellsMut for [Cell] {
    #[inline(always)]
    fn cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self[index]
    }
}

/// A view of the `next` buffer that may only write inside a band of rows.
///
/// Several bands over the same buffer are alive at once during the interior
/// pass, one per worker. Soundness rests on the bands being pairwise disjoint;
/// the row check runs in debug builds.
pub(crate) struct RowBand<'a> {
    ptr: *mut Cell,
    len: usize,
    torus: Torus,
    rows: RangeInclusive<usize>,
    _buf: PhantomData<&'a mut [Cell]>,
}

impl<'a> RowBand<'a> {
    /// # Safety
    /// `ptr` must be valid for reads and writes of `torus.cell_count()` cells for
    /// `'a`, and no other live reference may touch a cell whose row lies in
    /// `rows` while this band exists.
    #[inline]
    pub(crate) unsafe fn new(ptr: *mut Cell, torus: Torus, rows: RangeInclusive<usize>) -> Self {
        debug_assert!(!ptr.is_null());
        debug_assert!(*rows.end() < torus.nrows());
        Self {
            ptr,
            len: torus.cell_count(),
            torus,
            rows,
            _buf: PhantomData,
        }
    }
}

impl CellsMut for RowBand<'_> {
    #[inline(always)]
    fn cell_mut(&mut self, index: usize) -> &mut Cell {
        assert!(index < self.len);
        debug_assert!(
            self.rows.contains(&self.torus.row_of(index)),
            "write to row {} outside band {:?}",
            self.torus.row_of(index),
            self.rows
        );
        // SAFETY: in bounds (checked above) and the row lies inside this band,
        // which no other thread writes while the band exists.
        unsafe { &mut *self.ptr.add(index) }
    }
}

/// Apply one generation's transition to every cell of `row`.
///
/// A birth sets the alive bit in `next` and increments the count of all eight
/// neighbors in `next`; a death does the reverse. Unchanged cells are not
/// written. Returns the number of cells that changed state.
#[inline]
pub(crate) fn update_row<W>(row: usize, current: &[Cell], next: &mut W, torus: Torus) -> usize
where
    W: CellsMut + ?Sized,
{
    debug_assert_eq!(current.len(), torus.cell_count());
    let nrows = torus.nrows();
    let mut changed = 0;

    for col in 0..torus.ncols() {
        let index = row + nrows * col;
        let cell = current[index];
        if cell.will_be_born() {
            next.cell_mut(index).set_alive();
            for neighbor in torus.neighbors(row, col) {
                next.cell_mut(neighbor).increment_neighbor_count();
            }
            changed += 1;
        } else if cell.will_die() {
            next.cell_mut(index).set_dead();
            for neighbor in torus.neighbors(row, col) {
                next.cell_mut(neighbor).decrement_neighbor_count();
            }
            changed += 1;
        }
    }

    changed
}
