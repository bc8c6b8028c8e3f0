//! JSON shapes exchanged with the pool store and the live score feed, and their conversion into
//! engine types.

pub use board::*;
pub use error::*;
pub use live::*;
pub use pool::*;

mod board;
mod error;
mod live;
mod pool;
