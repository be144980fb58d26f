//! Board buffers, the text loader and the result writer.
//!
//! The on-disk format is a plain bitmap:
//!
//! ```text
//! P1
//! <nrows> <ncols>
//! <nrows * ncols cells, '0' or '1', whitespace ignored>
//! ```
//!
//! Cells are listed in flat index order (`row + nrows * col`).

use std::io::{BufWriter, Read, Write};

use tracing::debug;

use super::cell::Cell;
use super::error::{Result, RowLifeError};
use super::torus::Torus;

/// Largest board the loader accepts.
pub const MAX_CELLS: u64 = 100_000_000;

const MAGIC: &str = "P1";

/// Check dimensions before any buffer is sized from them.
pub fn validate_dimensions(nrows: i64, ncols: i64) -> Result<Torus> {
    if nrows < 1 {
        return Err(RowLifeError::dimensions(format!(
            "number of rows {nrows} must be positive"
        )));
    }
    if ncols < 1 {
        return Err(RowLifeError::dimensions(format!(
            "number of columns {ncols} must be positive"
        )));
    }
    let cells = (nrows as u64).saturating_mul(ncols as u64);
    if cells > MAX_CELLS {
        return Err(RowLifeError::BoardTooLarge {
            cells,
            max: MAX_CELLS,
        });
    }
    Ok(Torus::new(nrows as usize, ncols as usize))
}

/// A packed board whose neighbor counts match its alive cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    torus: Torus,
    cells: Vec<Cell>,
}

impl Board {
    /// An all-dead board.
    pub fn new(nrows: usize, ncols: usize) -> Result<Self> {
        let torus = validate_dimensions(nrows as i64, ncols as i64)?;
        Ok(Self {
            torus,
            cells: vec![Cell::DEAD; torus.cell_count()],
        })
    }

    /// A board with the given cells alive. Coordinates wrap.
    pub fn from_alive<I>(nrows: usize, ncols: usize, alive: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut board = Self::new(nrows, ncols)?;
        for (row, col) in alive {
            let index = board.torus.index(row % nrows, col % ncols);
            board.cells[index].set_alive();
        }
        board.recount_neighbors();
        Ok(board)
    }

    /// A board from one byte per cell in flat order; nonzero means alive.
    pub fn from_alive_mask(nrows: usize, ncols: usize, mask: &[u8]) -> Result<Self> {
        let mut board = Self::new(nrows, ncols)?;
        if mask.len() != board.cells.len() {
            return Err(RowLifeError::SizeMismatch {
                expected: board.cells.len(),
                found: mask.len(),
            });
        }
        for (cell, &value) in board.cells.iter_mut().zip(mask) {
            if value != 0 {
                cell.set_alive();
            }
        }
        board.recount_neighbors();
        Ok(board)
    }

    /// Wrap an already-counted buffer. Counts are trusted, not recomputed.
    pub fn from_cells(nrows: usize, ncols: usize, cells: Vec<Cell>) -> Result<Self> {
        let torus = validate_dimensions(nrows as i64, ncols as i64)?;
        if cells.len() != torus.cell_count() {
            return Err(RowLifeError::SizeMismatch {
                expected: torus.cell_count(),
                found: cells.len(),
            });
        }
        Ok(Self { torus, cells })
    }

    #[inline]
    pub fn torus(&self) -> Torus {
        self.torus
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.torus.nrows()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.torus.ncols()
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.cells[self.torus.index(row, col)].is_alive()
    }

    pub fn population(&self) -> u64 {
        self.cells.iter().filter(|c| c.is_alive()).count() as u64
    }

    /// Rebuild every neighbor count from the alive flags.
    pub fn recount_neighbors(&mut self) {
        for cell in &mut self.cells {
            *cell = if cell.is_alive() { Cell::ALIVE } else { Cell::DEAD };
        }
        let torus = self.torus;
        for col in 0..torus.ncols() {
            for row in 0..torus.nrows() {
                if self.cells[torus.index(row, col)].is_alive() {
                    for neighbor in torus.neighbors(row, col) {
                        self.cells[neighbor].increment_neighbor_count();
                    }
                }
            }
        }
    }

    /// First cell whose stored count disagrees with its live neighbors, as
    /// `(row, col, expected, stored)`.
    pub fn count_mismatch(&self) -> Option<(usize, usize, u8, u8)> {
        count_mismatch(self.torus, &self.cells)
    }
}

pub(crate) fn count_mismatch(torus: Torus, cells: &[Cell]) -> Option<(usize, usize, u8, u8)> {
    for col in 0..torus.ncols() {
        for row in 0..torus.nrows() {
            let expected = torus
                .neighbors(row, col)
                .iter()
                .filter(|&&n| cells[n].is_alive())
                .count() as u8;
            let stored = cells[torus.index(row, col)].neighbor_count();
            if expected != stored {
                return Some((row, col, expected, stored));
            }
        }
    }
    None
}

/// Alive/dead result of a run: one byte per cell, alive flag in bit 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalBoard {
    torus: Torus,
    cells: Vec<u8>,
}

impl FinalBoard {
    pub(crate) fn reduce(torus: Torus, cells: Vec<Cell>) -> Self {
        let cells = cells.into_iter().map(Cell::reduced).collect();
        Self { torus, cells }
    }

    #[inline]
    pub fn torus(&self) -> Torus {
        self.torus
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.cells[self.torus.index(row, col)] & 1 != 0
    }

    pub fn population(&self) -> u64 {
        self.cells.iter().filter(|&&c| c & 1 != 0).count() as u64
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Live cells as `(row, col)`, column-major order.
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        let nrows = self.torus.nrows();
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c & 1 != 0)
            .map(|(i, _)| (i % nrows, i / nrows))
            .collect()
    }
}

struct Tokens<'a> {
    rest: &'a [u8],
}

impl<'a> Tokens<'a> {
    fn skip_whitespace(&mut self) {
        let start = self
            .rest
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(self.rest.len());
        self.rest = &self.rest[start..];
    }

    fn next_token(&mut self) -> Option<&'a [u8]> {
        self.skip_whitespace();
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .iter()
            .position(u8::is_ascii_whitespace)
            .unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }

    fn dimension(&mut self, what: &str) -> Result<i64> {
        let token = self
            .next_token()
            .ok_or_else(|| RowLifeError::dimensions(format!("missing {what}")))?;
        let text = String::from_utf8_lossy(token);
        text.parse::<i64>()
            .map_err(|_| RowLifeError::dimensions(format!("{what} {text:?} is not an integer")))
    }
}

/// Parse a board and initialize its neighbor counts.
///
/// Input is read as raw bytes, so a non-ASCII cell byte is a `BadCell`.
pub fn load_board<R: Read>(mut input: R) -> Result<Board> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;

    let mut tokens = Tokens { rest: &bytes };
    if tokens.next_token() != Some(MAGIC.as_bytes()) {
        return Err(RowLifeError::MissingHeader);
    }
    let nrows = tokens.dimension("row count")?;
    let ncols = tokens.dimension("column count")?;
    let torus = validate_dimensions(nrows, ncols)?;
    let expected = torus.cell_count();

    let mut cells = vec![Cell::DEAD; expected];
    let mut found = 0;
    for &byte in tokens.rest.iter().filter(|b| !b.is_ascii_whitespace()) {
        if found == expected {
            break;
        }
        match byte {
            b'0' => {}
            b'1' => cells[found].set_alive(),
            other => {
                return Err(RowLifeError::BadCell {
                    index: found,
                    value: std::ascii::escape_default(other).to_string(),
                });
            }
        }
        found += 1;
    }
    if found < expected {
        return Err(RowLifeError::Truncated { expected, found });
    }

    let mut board = Board { torus, cells };
    board.recount_neighbors();
    debug!(
        nrows = torus.nrows(),
        ncols = torus.ncols(),
        population = board.population(),
        "loaded board"
    );
    Ok(board)
}

/// Write a reduced board in the loader's format, one cell per line.
pub fn save_board<W: Write>(output: W, board: &FinalBoard) -> Result<()> {
    let mut out = BufWriter::new(output);
    let torus = board.torus();
    writeln!(out, "{MAGIC}")?;
    writeln!(out, "{} {}", torus.nrows(), torus.ncols())?;
    for &cell in board.as_bytes() {
        out.write_all(if cell & 1 != 0 { b"1\n" } else { b"0\n" })?;
    }
    out.flush()?;
    Ok(())
}
