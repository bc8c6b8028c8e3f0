use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Payout milestone. `Final` covers the fourth quarter and every overtime period.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Checkpoint {
    Q1,
    Q2,
    Q3,
    Final,
}

impl Checkpoint {
    pub const ALL: [Checkpoint; 4] = [
        Checkpoint::Q1,
        Checkpoint::Q2,
        Checkpoint::Q3,
        Checkpoint::Final,
    ];

    /// Quarter whose end decides this checkpoint.
    pub const fn quarter_number(self) -> u8 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Final => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Final => "Final",
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Final)
    }

    /// Checkpoint whose axis a score change would land on right now.
    pub fn active(live: Option<&LiveScoreState>) -> Self {
        let Some(live) = live else {
            return Self::Q1;
        };

        if live.is_manual || live.phase.is_finished() {
            return Self::Final;
        }

        match live.period {
            0 | 1 => Self::Q1,
            2 => Self::Q2,
            3 => Self::Q3,
            _ => Self::Final,
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Checkpoint {
    type Err = SquaresError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|checkpoint| checkpoint.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| SquaresError::UnknownCheckpoint(s.to_string()))
    }
}

/// Where a checkpoint stands in the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointStatus {
    /// Kickoff has not happened yet.
    Awaiting,
    /// The game is on but has not reached this checkpoint.
    Blank,
    /// This checkpoint is being played; its leader can still change.
    Live,
    /// Finished, the winning cell is permanent.
    Locked,
}

impl CheckpointStatus {
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }

    pub const fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

/// Status of `checkpoint` for the given snapshot.
///
/// A missing snapshot is treated as a game that has not kicked off. Manual scores have no
/// checkpoint progression, so only `Final` is reported, and always as live.
pub fn checkpoint_status(
    checkpoint: Checkpoint,
    live: Option<&LiveScoreState>,
) -> CheckpointStatus {
    use CheckpointStatus::*;

    let Some(live) = live else {
        return Awaiting;
    };

    if live.is_manual {
        return if checkpoint.is_final() { Live } else { Blank };
    }

    let quarter = checkpoint.quarter_number();
    match live.phase {
        GamePhase::Pre => Awaiting,
        GamePhase::Post => Locked,
        GamePhase::In if checkpoint.is_final() => {
            if live.period >= quarter {
                Live
            } else {
                Blank
            }
        }
        GamePhase::In if live.period < quarter => Blank,
        GamePhase::In if live.period == quarter => Live,
        GamePhase::In => Locked,
    }
}
