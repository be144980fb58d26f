//! Error types for RowLife.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowLifeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing 'P1' header")]
    MissingHeader,

    #[error("bad board dimensions: {0}")]
    BadDimensions(String),

    #[error("board too large: {cells} cells exceeds the limit of {max}")]
    BoardTooLarge { cells: u64, max: u64 },

    #[error("ran out of input at cell {found} of {expected}")]
    Truncated { expected: usize, found: usize },

    #[error("cell {index} has value {value:?}, expected '0' or '1'")]
    BadCell { index: usize, value: String },

    #[error("board buffer holds {found} cells, dimensions require {expected}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, RowLifeError>;

impl RowLifeError {
    pub fn dimensions(msg: impl Into<String>) -> Self {
        Self::BadDimensions(msg.into())
    }
}
