use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Prize amount attached to each checkpoint. Amounts are display values only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payouts {
    #[serde(rename = "Q1")]
    pub q1: u32,
    #[serde(rename = "Q2")]
    pub q2: u32,
    #[serde(rename = "Q3")]
    pub q3: u32,
    #[serde(rename = "Final")]
    pub final_score: u32,
}

impl Default for Payouts {
    fn default() -> Self {
        Self {
            q1: 125,
            q2: 125,
            q3: 125,
            final_score: 250,
        }
    }
}

impl Payouts {
    pub const fn amount(&self, checkpoint: Checkpoint) -> u32 {
        match checkpoint {
            Checkpoint::Q1 => self.q1,
            Checkpoint::Q2 => self.q2,
            Checkpoint::Q3 => self.q3,
            Checkpoint::Final => self.final_score,
        }
    }

    pub fn total(&self) -> u32 {
        Checkpoint::ALL
            .into_iter()
            .map(|checkpoint| self.amount(checkpoint))
            .sum()
    }
}

/// How the cell on a payout line got there.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Holding {
    /// Locked, this cell is paid.
    Winner,
    /// Leading a checkpoint still being played.
    CurrentHolder,
    /// Cell matching operator-entered scores.
    CurrentScore,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutLine {
    pub checkpoint: Checkpoint,
    pub amount: u32,
    pub status: CheckpointStatus,
    pub holding: Option<Holding>,
    pub key: Option<CellKey>,
    pub owners: Vec<String>,
    /// 1-based square number of the cell.
    pub square: Option<usize>,
}

/// One line per checkpoint with its prize and who holds it right now.
pub fn payout_lines(
    board: &Board,
    resolution: &Resolution,
    payouts: &Payouts,
) -> Vec<PayoutLine> {
    Checkpoint::ALL
        .into_iter()
        .map(|checkpoint| {
            let outcome = resolution.outcome(checkpoint);
            let mut line = PayoutLine {
                checkpoint,
                amount: payouts.amount(checkpoint),
                status: outcome.status,
                holding: None,
                key: None,
                owners: Vec::new(),
                square: None,
            };

            let held = match outcome.status {
                CheckpointStatus::Locked => resolution
                    .winners()
                    .get(checkpoint)
                    .map(|key| (Holding::Winner, key, outcome.cell)),
                CheckpointStatus::Live => resolution
                    .leader()
                    .filter(|leader| leader.checkpoint == checkpoint)
                    .map(|leader| {
                        let holding = if leader.manual {
                            Holding::CurrentScore
                        } else {
                            Holding::CurrentHolder
                        };
                        (holding, leader.key, leader.cell)
                    }),
                CheckpointStatus::Awaiting | CheckpointStatus::Blank => None,
            };

            if let Some((holding, key, cell)) = held {
                line.holding = Some(holding);
                line.key = Some(key);
                if let Some(cell) = cell {
                    line.owners = board.owners(cell).to_vec();
                    line.square = Some(cell.square_number());
                }
            }
            line
        })
        .collect()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCoverage {
    pub filled: usize,
    pub open: usize,
    /// Filled share of the board, rounded to a whole percent.
    pub percent: u8,
}

impl BoardCoverage {
    pub fn of(board: &Board) -> Self {
        let filled = board
            .iter_cells()
            .filter(|(_, owners)| !owners.is_empty())
            .count();
        Self {
            filled,
            open: CELL_COUNT - filled,
            percent: ((filled * 100 + CELL_COUNT / 2) / CELL_COUNT) as u8,
        }
    }

    pub const fn is_full(&self) -> bool {
        self.open == 0
    }
}

/// Every distinct owner name on the board, sorted.
pub fn participants(board: &Board) -> Vec<String> {
    board
        .iter_cells()
        .flat_map(|(_, owners)| owners.iter().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantStats {
    pub query: String,
    pub squares: Vec<GridPos>,
    pub investment: u32,
}

/// Cells owned by anyone whose name contains `query`, ignoring case.
///
/// A cell shared by several matching names counts once. Returns `None` for an empty query.
pub fn participant_stats(
    board: &Board,
    query: &str,
    price_per_square: u32,
) -> Option<ParticipantStats> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let squares: Vec<GridPos> = board
        .iter_cells()
        .filter(|(_, owners)| {
            owners
                .iter()
                .any(|owner| owner.to_lowercase().contains(needle.as_str()))
        })
        .map(|(pos, _)| pos)
        .collect();
    let investment = price_per_square.saturating_mul(squares.len() as u32);

    Some(ParticipantStats {
        query: query.trim().to_string(),
        squares,
        investment,
    })
}
