//! Toroidal addressing for a column-major board.
//!
//! Cell `(row, col)` lives at flat index `row + nrows * col`. Both axes wrap.

/// Nonnegative remainder: `wrap(-1, m) == m - 1` for any `m > 0`.
#[inline(always)]
pub fn wrap(x: isize, m: usize) -> usize {
    debug_assert!(m > 0);
    let m = m as isize;
    let r = x % m;
    (if r < 0 { r + m } else { r }) as usize
}

/// The eight compass offsets as `(d_row, d_col)`.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Torus {
    nrows: usize,
    ncols: usize,
}

impl Torus {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        assert!(nrows > 0 && ncols > 0, "torus dimensions must be positive");
        Self { nrows, ncols }
    }

    #[inline(always)]
    pub fn nrows(self) -> usize {
        self.nrows
    }

    #[inline(always)]
    pub fn ncols(self) -> usize {
        self.ncols
    }

    /// Number of cells, `nrows * ncols`.
    #[inline(always)]
    pub fn cell_count(self) -> usize {
        self.nrows * self.ncols
    }

    #[inline(always)]
    pub fn index(self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.nrows && col < self.ncols);
        row + self.nrows * col
    }

    /// Row of a flat index.
    #[inline(always)]
    pub fn row_of(self, index: usize) -> usize {
        index % self.nrows
    }

    /// Flat indices of the eight toroidal neighbors of `(row, col)`, in
    /// `NEIGHBOR_OFFSETS` order. Slots may repeat on grids narrower than 3.
    #[inline(always)]
    pub fn neighbors(self, row: usize, col: usize) -> [usize; 8] {
        let north = wrap(row as isize - 1, self.nrows);
        let south = wrap(row as isize + 1, self.nrows);
        let west = self.nrows * wrap(col as isize - 1, self.ncols);
        let here = self.nrows * col;
        let east = self.nrows * wrap(col as isize + 1, self.ncols);
        [
            north + west,
            north + here,
            north + east,
            row + west,
            row + east,
            south + west,
            south + here,
            south + east,
        ]
    }
}
