use alloc::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Locked winning cells by checkpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerMap(BTreeMap<Checkpoint, CellKey>);

impl WinnerMap {
    pub fn get(&self, checkpoint: Checkpoint) -> Option<CellKey> {
        self.0.get(&checkpoint).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Checkpoint, CellKey)> + '_ {
        self.0.iter().map(|(&checkpoint, &key)| (checkpoint, key))
    }

    /// Checkpoints won by the cell `key`.
    pub fn checkpoints_won_by(&self, key: CellKey) -> impl Iterator<Item = Checkpoint> + '_ {
        self.iter()
            .filter(move |&(_, won)| won == key)
            .map(|(checkpoint, _)| checkpoint)
    }
}

/// Cell currently in front for a checkpoint still being played. Never a payable winner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    pub checkpoint: Checkpoint,
    pub key: CellKey,
    pub cell: Option<GridPos>,
    /// Comes from operator-entered scores rather than the feed.
    pub manual: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointOutcome {
    pub checkpoint: Checkpoint,
    pub status: CheckpointStatus,
    /// Locked winner or live leader, when the digits could be worked out.
    pub key: Option<CellKey>,
    /// Grid cell for `key` under this checkpoint's axes.
    pub cell: Option<GridPos>,
    /// Why the digits could not be worked out.
    pub fault: Option<SquaresError>,
}

impl CheckpointOutcome {
    fn new(checkpoint: Checkpoint, status: CheckpointStatus) -> Self {
        Self {
            checkpoint,
            status,
            key: None,
            cell: None,
            fault: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    outcomes: [CheckpointOutcome; 4],
    winners: WinnerMap,
    leader: Option<Leader>,
}

impl Resolution {
    pub fn outcome(&self, checkpoint: Checkpoint) -> &CheckpointOutcome {
        &self.outcomes[checkpoint as usize]
    }

    pub fn outcomes(&self) -> &[CheckpointOutcome] {
        &self.outcomes
    }

    pub fn status(&self, checkpoint: Checkpoint) -> CheckpointStatus {
        self.outcome(checkpoint).status
    }

    pub fn winners(&self) -> &WinnerMap {
        &self.winners
    }

    pub fn leader(&self) -> Option<&Leader> {
        self.leader.as_ref()
    }

    pub fn faults(&self) -> impl Iterator<Item = (Checkpoint, &SquaresError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|outcome| Some((outcome.checkpoint, outcome.fault.as_ref()?)))
    }
}

/// Works out every checkpoint's status, the locked winners and the live leader.
///
/// The result depends only on the arguments; calling it again with the same board and snapshot
/// gives the same resolution.
pub fn resolve(board: &Board, live: Option<&LiveScoreState>) -> Resolution {
    let outcomes = Checkpoint::ALL.map(|checkpoint| evaluate(board, live, checkpoint));

    let mut winners = WinnerMap::default();
    let mut leader = None;
    for outcome in &outcomes {
        let Some(key) = outcome.key else {
            continue;
        };
        match outcome.status {
            CheckpointStatus::Locked if outcome.cell.is_some() => {
                winners.0.insert(outcome.checkpoint, key);
            }
            CheckpointStatus::Live => {
                leader = Some(Leader {
                    checkpoint: outcome.checkpoint,
                    key,
                    cell: outcome.cell,
                    manual: live.is_some_and(|live| live.is_manual),
                });
            }
            _ => {}
        }
    }

    log::debug!(
        "resolved {} locked winner(s), leader: {:?}",
        winners.len(),
        leader.map(|leader| leader.key)
    );

    Resolution {
        outcomes,
        winners,
        leader,
    }
}

fn evaluate(
    board: &Board,
    live: Option<&LiveScoreState>,
    checkpoint: Checkpoint,
) -> CheckpointOutcome {
    let status = checkpoint_status(checkpoint, live);
    let mut outcome = CheckpointOutcome::new(checkpoint, status);
    log::trace!("{checkpoint}: {status:?}");

    if !matches!(status, CheckpointStatus::Locked | CheckpointStatus::Live) {
        return outcome;
    }

    let key = match checkpoint_key(checkpoint, live) {
        Ok(Some(key)) => key,
        Ok(None) => return outcome,
        Err(err) => {
            log::warn!("{checkpoint} left unresolved: {err}");
            outcome.fault = Some(err);
            return outcome;
        }
    };

    outcome.key = Some(key);
    outcome.cell = cell_index_for(key.top, key.left, checkpoint, board);
    if outcome.cell.is_none() {
        log::debug!("{checkpoint}: {key} has no cell on the current axes");
    }
    outcome
}

fn checkpoint_key(
    checkpoint: Checkpoint,
    live: Option<&LiveScoreState>,
) -> Result<Option<CellKey>> {
    let top = digit_at(Team::Top, checkpoint, live)?;
    let left = digit_at(Team::Left, checkpoint, live)?;
    Ok(top.zip(left).map(|(top, left)| CellKey::new(top, left)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn board(axes: AxisAssignment) -> Board {
        let cells: Vec<Owners> = (0..CELL_COUNT)
            .map(|index| {
                let mut owners = Owners::new();
                owners.push(alloc::format!("p{index}"));
                owners
            })
            .collect();
        Board::from_cells(axes, cells).unwrap()
    }

    fn identity_board() -> Board {
        board(AxisAssignment::Static(AxisPair::new(
            Axis::identity(),
            Axis::identity(),
        )))
    }

    fn snapshot(
        phase: GamePhase,
        period: u8,
        (left, top): (Points, Points),
        quarters: &[(ScoringPeriod, Points, Points)],
    ) -> LiveScoreState {
        LiveScoreState {
            left_score: left,
            top_score: top,
            quarter_scores: quarters.iter().fold(
                QuarterScores::default(),
                |acc, &(period, left, top)| acc.with(period, PeriodPoints::new(left, top)),
            ),
            period,
            phase,
            is_manual: false,
        }
    }

    fn mid_second_quarter() -> LiveScoreState {
        snapshot(GamePhase::In, 2, (10, 7), &[(ScoringPeriod::Q1, 7, 3)])
    }

    fn finished_overtime() -> LiveScoreState {
        snapshot(
            GamePhase::Post,
            5,
            (23, 20),
            &[
                (ScoringPeriod::Q1, 7, 3),
                (ScoringPeriod::Q2, 7, 0),
                (ScoringPeriod::Q3, 3, 7),
                (ScoringPeriod::Q4, 3, 10),
                (ScoringPeriod::Overtime, 3, 0),
            ],
        )
    }

    fn key(text: &str) -> CellKey {
        text.parse().unwrap()
    }

    #[test]
    fn pre_game_has_no_winners() {
        let live = snapshot(GamePhase::Pre, 0, (0, 0), &[]);
        let resolution = resolve(&identity_board(), Some(&live));

        for checkpoint in Checkpoint::ALL {
            assert_eq!(resolution.status(checkpoint), CheckpointStatus::Awaiting);
        }
        assert!(resolution.winners().is_empty());
        assert_eq!(resolution.leader(), None);
    }

    #[test]
    fn missing_feed_awaits_kickoff() {
        let resolution = resolve(&identity_board(), None);

        assert!(resolution.winners().is_empty());
        assert!(
            resolution
                .outcomes()
                .iter()
                .all(|outcome| outcome.status == CheckpointStatus::Awaiting)
        );
    }

    #[test]
    fn mid_second_quarter_locks_first_and_leads_second() {
        let resolution = resolve(&identity_board(), Some(&mid_second_quarter()));

        assert_eq!(resolution.status(Checkpoint::Q1), CheckpointStatus::Locked);
        assert_eq!(resolution.winners().get(Checkpoint::Q1), Some(key("3-7")));
        assert_eq!(resolution.outcome(Checkpoint::Q1).cell, Some(GridPos::new(7, 3)));

        assert_eq!(resolution.status(Checkpoint::Q2), CheckpointStatus::Live);
        assert_eq!(resolution.winners().get(Checkpoint::Q2), None);
        let leader = resolution.leader().unwrap();
        assert_eq!(leader.checkpoint, Checkpoint::Q2);
        assert_eq!(leader.key.to_string(), "7-0");
        assert!(!leader.manual);

        assert_eq!(resolution.status(Checkpoint::Q3), CheckpointStatus::Blank);
        assert_eq!(resolution.status(Checkpoint::Final), CheckpointStatus::Blank);
        assert_eq!(resolution.winners().len(), 1);
    }

    #[test]
    fn finished_overtime_locks_every_checkpoint() {
        let resolution = resolve(&identity_board(), Some(&finished_overtime()));
        let winners = resolution.winners();

        assert_eq!(winners.get(Checkpoint::Q1), Some(key("3-7")));
        assert_eq!(winners.get(Checkpoint::Q2), Some(key("3-4")));
        assert_eq!(winners.get(Checkpoint::Q3), Some(key("0-7")));
        assert_eq!(winners.get(Checkpoint::Final).unwrap().to_string(), "0-3");
        assert_eq!(resolution.leader(), None);
        assert_eq!(resolution.faults().count(), 0);
    }

    #[test]
    fn manual_scores_produce_only_a_transient_leader() {
        let mut live = LiveScoreState::manual(14, 21);
        for (phase, period) in [(GamePhase::Pre, 0), (GamePhase::In, 3), (GamePhase::Post, 5)] {
            live.phase = phase;
            live.period = period;
            let resolution = resolve(&identity_board(), Some(&live));

            assert!(resolution.winners().is_empty());
            let leader = resolution.leader().unwrap();
            assert_eq!(leader.key.to_string(), "1-4");
            assert_eq!(leader.checkpoint, Checkpoint::Final);
            assert!(leader.manual);
        }
    }

    #[test]
    fn incomplete_axis_omits_winner() {
        let resolution = resolve(&board(AxisAssignment::default()), Some(&finished_overtime()));

        assert!(resolution.winners().is_empty());
        let final_outcome = resolution.outcome(Checkpoint::Final);
        assert_eq!(final_outcome.status, CheckpointStatus::Locked);
        assert_eq!(final_outcome.key, Some(key("0-3")));
        assert_eq!(final_outcome.cell, None);
    }

    #[test]
    fn dynamic_board_resolves_each_checkpoint_on_its_own_axes() {
        let reversed = Axis::from_digits(
            [9, 8, 7, 6, 5, 4, 3, 2, 1, 0].map(|value| Digit::new(value).unwrap()),
        );
        let axes = AxisAssignment::Dynamic(BTreeMap::from([
            (Checkpoint::Q1, AxisPair::new(Axis::identity(), Axis::identity())),
            (Checkpoint::Q2, AxisPair::new(reversed, reversed)),
        ]));
        let live = snapshot(
            GamePhase::In,
            3,
            (14, 10),
            &[(ScoringPeriod::Q1, 7, 3), (ScoringPeriod::Q2, 0, 0)],
        );

        let resolution = resolve(&board(axes), Some(&live));

        assert_eq!(resolution.winners().get(Checkpoint::Q1), Some(key("3-7")));
        assert_eq!(resolution.winners().get(Checkpoint::Q2), Some(key("3-7")));
        assert_eq!(resolution.outcome(Checkpoint::Q1).cell, Some(GridPos::new(7, 3)));
        assert_eq!(resolution.outcome(Checkpoint::Q2).cell, Some(GridPos::new(2, 6)));
        // Q3 has no axes drawn yet
        let leader = resolution.leader().unwrap();
        assert_eq!(leader.checkpoint, Checkpoint::Q3);
        assert_eq!(leader.cell, None);
    }

    #[test]
    fn inconsistent_checkpoint_does_not_sink_the_others() {
        let live = snapshot(
            GamePhase::In,
            3,
            (6, 3),
            &[(ScoringPeriod::Q1, 3, 3), (ScoringPeriod::Q2, 7, 0)],
        );

        let resolution = resolve(&identity_board(), Some(&live));

        assert_eq!(resolution.winners().get(Checkpoint::Q1), Some(key("3-3")));
        assert_eq!(resolution.winners().get(Checkpoint::Q2), None);
        assert!(matches!(
            resolution.outcome(Checkpoint::Q2).fault,
            Some(SquaresError::InvalidScoreState(_))
        ));
        assert_eq!(resolution.leader().map(|leader| leader.key), Some(key("3-6")));
    }

    #[test]
    fn finished_game_without_deltas_locks_nothing() {
        let live = snapshot(GamePhase::Post, 4, (24, 20), &[]);

        let resolution = resolve(&identity_board(), Some(&live));

        assert!(resolution.winners().is_empty());
        assert_eq!(resolution.faults().count(), Checkpoint::ALL.len());
        for outcome in resolution.outcomes() {
            assert_eq!(outcome.status, CheckpointStatus::Locked);
            assert_eq!(outcome.key, None);
            assert!(matches!(
                outcome.fault,
                Some(SquaresError::InvalidScoreState(ScoreFault::DeltaMismatch { .. }))
            ));
        }
    }

    #[test]
    fn winners_never_include_unlocked_checkpoints() {
        let board = identity_board();
        for phase in [GamePhase::Pre, GamePhase::In, GamePhase::Post] {
            for period in 0..=6 {
                let live = snapshot(phase, period, (0, 0), &[]);
                let resolution = resolve(&board, Some(&live));
                for (checkpoint, _) in resolution.winners().iter() {
                    assert!(resolution.status(checkpoint).is_locked());
                }
            }
        }
    }

    #[test]
    fn repeated_resolution_is_identical() {
        let board = identity_board();
        let live = finished_overtime();

        assert_eq!(resolve(&board, Some(&live)), resolve(&board, Some(&live)));
    }

    #[test]
    fn winner_map_serializes_keys_by_label() {
        let resolution = resolve(&identity_board(), Some(&mid_second_quarter()));

        assert_eq!(
            serde_json::to_string(resolution.winners()).unwrap(),
            r#"{"Q1":"3-7"}"#
        );
        assert_eq!(
            serde_json::to_value(resolution.leader()).unwrap()["key"],
            "7-0"
        );
    }

    #[test]
    fn winner_map_lists_checkpoints_per_cell() {
        let live = snapshot(GamePhase::Post, 4, (0, 0), &[]);
        let resolution = resolve(&identity_board(), Some(&live));
        let won: Vec<_> = resolution.winners().checkpoints_won_by(key("0-0")).collect();

        assert_eq!(won, Checkpoint::ALL);
    }
}
