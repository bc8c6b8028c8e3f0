use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Ways a team can put points on the board in one play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringPlay {
    Safety,
    FieldGoal,
    TouchdownNoKick,
    TouchdownKick,
    TouchdownTwoPoint,
}

impl ScoringPlay {
    pub const ALL: [ScoringPlay; 5] = [
        ScoringPlay::Safety,
        ScoringPlay::FieldGoal,
        ScoringPlay::TouchdownNoKick,
        ScoringPlay::TouchdownKick,
        ScoringPlay::TouchdownTwoPoint,
    ];

    pub const fn points(self) -> Points {
        match self {
            Self::Safety => 2,
            Self::FieldGoal => 3,
            Self::TouchdownNoKick => 6,
            Self::TouchdownKick => 7,
            Self::TouchdownTwoPoint => 8,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Safety => "Safety (+2)",
            Self::FieldGoal => "Field Goal (+3)",
            Self::TouchdownNoKick => "TD Miss XP (+6)",
            Self::TouchdownKick => "TD + Kick (+7)",
            Self::TouchdownTwoPoint => "TD + 2pt (+8)",
        }
    }
}

/// Cell a hypothetical score would land on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub team: Team,
    pub play: ScoringPlay,
    /// Checkpoint whose axes the projection was looked up on.
    pub checkpoint: Checkpoint,
    pub key: CellKey,
    /// `None` when the active axes are not fully drawn.
    pub cell: Option<GridPos>,
}

/// Cell that would lead if `team` scored `play` right now.
///
/// Only the running scores are used, the other team's digit stays as it is. A missing snapshot
/// projects from a 0-0 game.
pub fn project(
    board: &Board,
    team: Team,
    live: Option<&LiveScoreState>,
    play: ScoringPlay,
) -> Projection {
    let score_of = |side: Team| live.map_or(0, |live| live.score(side));

    // (score + points) mod 10, reduced first so the sum cannot overflow
    let scoring = Digit::of(score_of(team) % 10 + play.points());
    let standing = Digit::of(score_of(team.other()));
    let key = match team {
        Team::Left => CellKey::new(standing, scoring),
        Team::Top => CellKey::new(scoring, standing),
    };

    let checkpoint = Checkpoint::active(live);
    let cell = cell_index_for(key.top, key.left, checkpoint, board);
    log::trace!("{team} {}: {key} on {checkpoint} axes", play.label());

    Projection {
        team,
        play,
        checkpoint,
        key,
        cell,
    }
}

/// Projections for every play in [`ScoringPlay::ALL`], in order.
pub fn project_all(board: &Board, team: Team, live: Option<&LiveScoreState>) -> Vec<Projection> {
    ScoringPlay::ALL
        .into_iter()
        .map(|play| project(board, team, live, play))
        .collect()
}
