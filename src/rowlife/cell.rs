//! Packed per-cell state for RowLife.
//!
//! One byte per cell:
//! - bits 0..=3: live neighbor count (0..=8)
//! - bit 4: alive flag
//! - bits 5..=7: reserved
//!
//! Birth and death decisions are made directly on the packed byte so the hot
//! loop never decodes `(alive, count)` into separate values.

/// Width of the neighbor-count field in bits.
pub const COUNT_BITS: u32 = 4;
/// Mask selecting the neighbor-count field.
pub const COUNT_MASK: u8 = (1 << COUNT_BITS) - 1;
/// Alive flag, sitting just above the count field.
pub const ALIVE_BIT: u8 = 1 << COUNT_BITS;
/// Count and alive flag together; everything above is reserved.
const STATE_MASK: u8 = ALIVE_BIT | COUNT_MASK;

const BIRTH_STATE: u8 = 3;
const DIE_AT_OR_BELOW: u8 = ALIVE_BIT | 1;
const DIE_AT_OR_ABOVE: u8 = ALIVE_BIT | 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Cell(u8);

impl Cell {
    pub const DEAD: Cell = Cell(0);
    pub const ALIVE: Cell = Cell(ALIVE_BIT);

    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Self {
        Cell(bits)
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn is_alive(self) -> bool {
        self.0 & ALIVE_BIT != 0
    }

    #[inline(always)]
    pub fn set_alive(&mut self) {
        self.0 |= ALIVE_BIT;
    }

    #[inline(always)]
    pub fn set_dead(&mut self) {
        self.0 &= !ALIVE_BIT;
    }

    #[inline(always)]
    pub const fn neighbor_count(self) -> u8 {
        self.0 & COUNT_MASK
    }

    /// Callers guarantee the count stays within 0..=8.
    #[inline(always)]
    pub fn increment_neighbor_count(&mut self) {
        debug_assert!(self.neighbor_count() < 8, "neighbor count overflow: {:#04x}", self.0);
        self.0 += 1;
    }

    #[inline(always)]
    pub fn decrement_neighbor_count(&mut self) {
        debug_assert!(self.neighbor_count() > 0, "neighbor count underflow: {:#04x}", self.0);
        self.0 -= 1;
    }

    /// Dead with exactly three live neighbors.
    #[inline(always)]
    pub const fn will_be_born(self) -> bool {
        self.0 & STATE_MASK == BIRTH_STATE
    }

    /// Alive with fewer than two or more than three live neighbors.
    #[inline(always)]
    pub const fn will_die(self) -> bool {
        let state = self.0 & STATE_MASK;
        state & ALIVE_BIT != 0 && (state <= DIE_AT_OR_BELOW || state >= DIE_AT_OR_ABOVE)
    }

    /// Alive flag moved to bit 0, count bits discarded.
    #[inline(always)]
    pub const fn reduced(self) -> u8 {
        self.0 >> COUNT_BITS
    }
}
