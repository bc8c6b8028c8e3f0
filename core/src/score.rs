use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

use crate::*;

/// Period of play that a feed reports points for. Every overtime period is folded into
/// [`ScoringPeriod::Overtime`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoringPeriod {
    Q1,
    Q2,
    Q3,
    Q4,
    #[serde(rename = "OT")]
    Overtime,
}

impl ScoringPeriod {
    pub const ALL: [ScoringPeriod; 5] = [
        ScoringPeriod::Q1,
        ScoringPeriod::Q2,
        ScoringPeriod::Q3,
        ScoringPeriod::Q4,
        ScoringPeriod::Overtime,
    ];

    /// 1-based period number, overtime starting at 5.
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
            Self::Overtime => "OT",
        }
    }
}

/// Points scored by each team during a single period.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPoints {
    pub left: Points,
    pub top: Points,
}

impl PeriodPoints {
    pub const fn new(left: Points, top: Points) -> Self {
        Self { left, top }
    }

    pub const fn get(self, team: Team) -> Points {
        match team {
            Team::Left => self.left,
            Team::Top => self.top,
        }
    }
}

/// Per-period deltas, one entry per [`ScoringPeriod`]. Periods a feed has not reported are zero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScores([PeriodPoints; 5]);

impl QuarterScores {
    pub fn with(mut self, period: ScoringPeriod, points: PeriodPoints) -> Self {
        self[period] = points;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoringPeriod, PeriodPoints)> + '_ {
        ScoringPeriod::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Sum of `team`'s deltas for every period numbered `through` or lower.
    pub fn sum_through(&self, team: Team, through: u8) -> u32 {
        self.iter()
            .filter(|(period, _)| period.number() <= through)
            .map(|(_, points)| u32::from(points.get(team)))
            .sum()
    }

    pub fn total(&self, team: Team) -> u32 {
        self.sum_through(team, u8::MAX)
    }
}

impl Index<ScoringPeriod> for QuarterScores {
    type Output = PeriodPoints;

    fn index(&self, period: ScoringPeriod) -> &Self::Output {
        &self.0[period as usize]
    }
}

impl IndexMut<ScoringPeriod> for QuarterScores {
    fn index_mut(&mut self, period: ScoringPeriod) -> &mut Self::Output {
        &mut self.0[period as usize]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Pre,
    In,
    Post,
}

impl GamePhase {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Post)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Pre
    }
}

/// Snapshot of a game's score, either from the live feed or typed in by an operator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveScoreState {
    pub left_score: Points,
    pub top_score: Points,
    pub quarter_scores: QuarterScores,
    /// Current period, 4 is the fourth quarter and anything above is overtime.
    pub period: u8,
    pub phase: GamePhase,
    /// Operator-entered scores; only the cumulative scores are meaningful.
    pub is_manual: bool,
}

impl LiveScoreState {
    pub fn manual(left_score: Points, top_score: Points) -> Self {
        Self {
            left_score,
            top_score,
            is_manual: true,
            ..Default::default()
        }
    }

    pub const fn score(&self, team: Team) -> Points {
        match team {
            Team::Left => self.left_score,
            Team::Top => self.top_score,
        }
    }

    /// Key of the cell matching the cumulative scores right now.
    pub const fn current_key(&self) -> CellKey {
        CellKey::from_scores(self.top_score, self.left_score)
    }

    pub const fn is_in_progress(&self) -> bool {
        matches!(self.phase, GamePhase::In)
    }

    /// Strict check that the period deltas agree with the cumulative scores.
    ///
    /// Manual snapshots always pass since their deltas carry no meaning. For any other snapshot
    /// no points may be recorded for a period that has not been reached, and the deltas of every
    /// reached period must add up to the cumulative score.
    pub fn check_consistency(&self) -> Result<()> {
        if self.is_manual {
            return Ok(());
        }

        for team in Team::ALL {
            if !self.phase.is_finished() {
                let late = self.quarter_scores.iter().find(|(period, points)| {
                    period.number() > self.period.max(1) && points.get(team) > 0
                });
                if let Some((period, _)) = late {
                    return Err(ScoreFault::PointsAfterPeriod {
                        team,
                        period: period.number(),
                    }
                    .into());
                }
            }

            let summed = self.quarter_scores.total(team);
            let score = self.score(team);
            if summed != u32::from(score) {
                return Err(ScoreFault::DeltaMismatch {
                    team,
                    summed,
                    score,
                }
                .into());
            }
        }

        Ok(())
    }
}
