use serde::{Deserialize, Serialize};
use squares_core::{
    GamePhase, LiveScoreState, PeriodPoints, QuarterScores, ScoringPeriod, Team,
    points_from_signed,
};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterPoints {
    #[serde(default)]
    pub left: i64,
    #[serde(default)]
    pub top: i64,
}

impl QuarterPoints {
    fn to_period_points(self) -> Result<PeriodPoints> {
        Ok(PeriodPoints::new(
            points_from_signed(Team::Left, self.left)?,
            points_from_signed(Team::Top, self.top)?,
        ))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScoresData {
    #[serde(rename = "Q1", default)]
    pub q1: QuarterPoints,
    #[serde(rename = "Q2", default)]
    pub q2: QuarterPoints,
    #[serde(rename = "Q3", default)]
    pub q3: QuarterPoints,
    #[serde(rename = "Q4", default)]
    pub q4: QuarterPoints,
    #[serde(rename = "OT", default)]
    pub ot: QuarterPoints,
}

impl QuarterScoresData {
    fn get(&self, period: ScoringPeriod) -> QuarterPoints {
        match period {
            ScoringPeriod::Q1 => self.q1,
            ScoringPeriod::Q2 => self.q2,
            ScoringPeriod::Q3 => self.q3,
            ScoringPeriod::Q4 => self.q4,
            ScoringPeriod::Overtime => self.ot,
        }
    }
}

/// Game snapshot as delivered by the score feed proxy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGameData {
    pub left_score: i64,
    pub top_score: i64,
    #[serde(default)]
    pub quarter_scores: QuarterScoresData,
    #[serde(default)]
    pub clock: String,
    #[serde(default)]
    pub period: i64,
    pub state: GamePhase,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub is_overtime: bool,
    #[serde(default)]
    pub is_manual: bool,
}

impl LiveGameData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Engine snapshot. Negative scores or an out-of-range period are rejected.
    pub fn to_score_state(&self) -> Result<LiveScoreState> {
        let quarter_scores = ScoringPeriod::ALL.into_iter().try_fold(
            QuarterScores::default(),
            |acc, period| -> Result<_> {
                Ok(acc.with(period, self.quarter_scores.get(period).to_period_points()?))
            },
        )?;

        let state = LiveScoreState {
            left_score: points_from_signed(Team::Left, self.left_score)?,
            top_score: points_from_signed(Team::Top, self.top_score)?,
            quarter_scores,
            period: u8::try_from(self.period).map_err(|_| ProtocolError::Period(self.period))?,
            phase: self.state,
            is_manual: self.is_manual,
        };
        log::debug!(
            "feed snapshot: {}-{} period {} {:?}",
            state.left_score,
            state.top_score,
            state.period,
            state.phase
        );
        Ok(state)
    }
}
