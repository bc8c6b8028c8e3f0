use serde::{Deserialize, Serialize};
use squares_core::{Board, LiveScoreState, Payouts, Team, points_from_signed};

use crate::*;

/// Pool settings as stored next to the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    pub title: String,
    pub meta: String,
    pub left_abbr: String,
    pub left_name: String,
    pub top_abbr: String,
    pub top_name: String,
    pub dates: String,
    pub lock_title: bool,
    pub lock_meta: bool,
    pub use_manual_scores: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_left_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_top_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payouts: Option<Payouts>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            title: String::new(),
            meta: "Super Bowl Party".into(),
            left_abbr: "DAL".into(),
            left_name: "Dallas Cowboys".into(),
            top_abbr: "WAS".into(),
            top_name: "Washington Commanders".into(),
            dates: String::new(),
            lock_title: false,
            lock_meta: false,
            use_manual_scores: false,
            manual_left_score: None,
            manual_top_score: None,
            cover_image: None,
            payouts: None,
        }
    }
}

impl GameState {
    pub fn payouts(&self) -> Payouts {
        self.payouts.unwrap_or_default()
    }

    pub fn team_abbr(&self, team: Team) -> &str {
        match team {
            Team::Left => &self.left_abbr,
            Team::Top => &self.top_abbr,
        }
    }

    pub fn team_name(&self, team: Team) -> &str {
        match team {
            Team::Left => &self.left_name,
            Team::Top => &self.top_name,
        }
    }

    /// Operator-entered snapshot, if manual scores are switched on. Unset scores count as 0.
    pub fn manual_override(&self) -> Result<Option<LiveScoreState>> {
        if !self.use_manual_scores {
            return Ok(None);
        }

        let left = points_from_signed(Team::Left, self.manual_left_score.unwrap_or(0))?;
        let top = points_from_signed(Team::Top, self.manual_top_score.unwrap_or(0))?;
        Ok(Some(LiveScoreState::manual(left, top)))
    }

    /// Snapshot the engine should run on: the manual override when enabled, the feed otherwise.
    pub fn effective_live(&self, feed: Option<&LiveGameData>) -> Result<Option<LiveScoreState>> {
        if let Some(manual) = self.manual_override()? {
            if feed.is_some() {
                log::debug!("manual scores override the live feed");
            }
            return Ok(Some(manual));
        }
        feed.map(LiveGameData::to_score_state).transpose()
    }
}

/// One stored pool: its settings and its board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub settings: GameState,
    #[serde(default)]
    pub board_data: BoardData,
}

impl PoolRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn board(&self) -> Result<Board> {
        self.board_data.to_board()
    }
}
