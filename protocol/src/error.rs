use squares_core::{SquaresError, Team};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Squares(#[from] SquaresError),
    #[error("The {side} axis has {len} slots, expected 10")]
    AxisLength { side: Team, len: usize },
    #[error("The {side} axis slot {slot} holds {value}, which is not a digit")]
    AxisDigit { side: Team, slot: usize, value: i64 },
    #[error("Period {0} is out of range")]
    Period(i64),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
