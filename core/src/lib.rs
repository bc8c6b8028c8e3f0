#![no_std]

extern crate alloc;

pub use board::*;
pub use checkpoint::*;
pub use digit::*;
pub use error::*;
pub use projection::*;
pub use resolver::*;
pub use score::*;
pub use summary::*;
pub use types::*;

mod board;
mod checkpoint;
mod digit;
mod error;
mod projection;
mod resolver;
mod score;
mod summary;
mod types;

/// Side length of the squares grid, both in rows and columns.
pub const GRID_SIDE: usize = 10;

/// Total number of cells on a board.
pub const CELL_COUNT: usize = GRID_SIDE * GRID_SIDE;
