//! RowLife engine internals and public API.

mod board;
mod cell;
mod engine;
mod error;
mod row;
mod scheduler;
mod torus;

pub use board::{Board, FinalBoard, MAX_CELLS, load_board, save_board};
pub use cell::{ALIVE_BIT, COUNT_BITS, COUNT_MASK, Cell};
pub use engine::{RowLife, RowLifeConfig, run};
pub use error::{Result, RowLifeError};
pub use scheduler::{GenerationScheduler, RowChunk, partition_rows};
pub use torus::{NEIGHBOR_OFFSETS, Torus, wrap};
