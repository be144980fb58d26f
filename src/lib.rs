//! Row-partitioned Conway's Game of Life (B3/S23) on a torus, with neighbor
//! counts maintained incrementally in each cell.

pub mod rowlife;
pub use rowlife::{Board, FinalBoard, RowLife, RowLifeConfig, RowLifeError, run};
