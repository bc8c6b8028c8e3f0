use alloc::string::String;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Checkpoint, Digit, Points, Team};

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquaresError {
    #[error("Invalid score state: {0}")]
    InvalidScoreState(ScoreFault),
    #[error("Unknown checkpoint {0:?}")]
    UnknownCheckpoint(String),
    #[error("Malformed cell key {0:?}")]
    InvalidCellKey(String),
    #[error("Digit {digit} appears more than once on the {side} axis")]
    InvalidAxis { side: Team, digit: Digit },
    #[error("Board must have exactly {expected} cells, got {actual}")]
    InvalidBoardShape { expected: usize, actual: usize },
}

/// Reasons a score snapshot cannot be trusted for digit derivation.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFault {
    #[error("{team} score is negative ({value})")]
    NegativeScore { team: Team, value: i64 },
    #[error("{team} score {value} is out of range")]
    ScoreOutOfRange { team: Team, value: i64 },
    #[error("{team} deltas through {checkpoint} sum to {summed}, more than the score of {score}")]
    DeltasExceedScore {
        team: Team,
        checkpoint: Checkpoint,
        summed: u32,
        score: Points,
    },
    #[error("{team} period deltas sum to {summed}, cumulative score is {score}")]
    DeltaMismatch { team: Team, summed: u32, score: Points },
    #[error("{team} has points recorded for period {period} which has not been reached")]
    PointsAfterPeriod { team: Team, period: u8 },
}

impl From<ScoreFault> for SquaresError {
    fn from(fault: ScoreFault) -> Self {
        Self::InvalidScoreState(fault)
    }
}

pub type Result<T> = core::result::Result<T, SquaresError>;
