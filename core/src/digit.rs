use crate::*;

/// Last digit of `team`'s score that applies to `checkpoint`.
///
/// `Ok(None)` means the checkpoint cannot be resolved from this snapshot yet. A finished quarter
/// is always derived from the summed period deltas rather than the running score, since the game
/// may be well past that quarter by the time it is evaluated.
pub fn digit_at(
    team: Team,
    checkpoint: Checkpoint,
    live: Option<&LiveScoreState>,
) -> Result<Option<Digit>> {
    let Some(live) = live else {
        return Ok(None);
    };

    let score = live.score(team);
    if live.is_manual {
        return Ok(checkpoint.is_final().then(|| Digit::of(score)));
    }

    let quarter = checkpoint.quarter_number();
    let finished = live.phase.is_finished();

    if checkpoint.is_final() {
        if !finished && live.period < quarter {
            return Ok(None);
        }
        if finished {
            check_final_deltas(team, live)?;
        }
        return Ok(Some(Digit::of(score)));
    }

    if !finished && live.period < quarter {
        return Ok(None);
    }

    if live.is_in_progress() && live.period == quarter {
        log::trace!("{checkpoint} in progress, {team} leading digit from score {score}");
        return Ok(Some(Digit::of(score)));
    }

    // a finished game must account for every point before any quarter locks on its deltas
    if finished {
        check_final_deltas(team, live)?;
    }

    let summed = live.quarter_scores.sum_through(team, quarter);
    if summed > u32::from(score) {
        return Err(ScoreFault::DeltasExceedScore {
            team,
            checkpoint,
            summed,
            score,
        }
        .into());
    }
    log::trace!("{checkpoint} closed, {team} deltas sum to {summed}");
    Ok(Some(Digit::of_sum(summed)))
}

/// A finished game must have period deltas adding up to the final score.
fn check_final_deltas(team: Team, live: &LiveScoreState) -> Result<()> {
    let summed = live.quarter_scores.total(team);
    let score = live.score(team);
    if summed == u32::from(score) {
        Ok(())
    } else {
        Err(ScoreFault::DeltaMismatch {
            team,
            summed,
            score,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(value: u8) -> Option<Digit> {
        Digit::new(value)
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

    fn finished_overtime() -> LiveScoreState {
        snapshot(
            GamePhase::Post,
            5,
            (23, 20),
            &[
                (ScoringPeriod::Q1, 7, 3),
                (ScoringPeriod::Q2, 3, 10),
                (ScoringPeriod::Q3, 0, 0),
                (ScoringPeriod::Q4, 10, 7),
                (ScoringPeriod::Overtime, 3, 0),
            ],
        )
    }

    #[test]
    fn missing_feed_resolves_nothing() {
        for checkpoint in Checkpoint::ALL {
            assert_eq!(digit_at(Team::Left, checkpoint, None), Ok(None));
        }
    }

    #[test]
    fn manual_scores_only_resolve_final() {
        let live = LiveScoreState::manual(14, 21);

        assert_eq!(digit_at(Team::Left, Checkpoint::Final, Some(&live)), Ok(digit(4)));
        assert_eq!(digit_at(Team::Top, Checkpoint::Final, Some(&live)), Ok(digit(1)));
        assert_eq!(digit_at(Team::Left, Checkpoint::Q1, Some(&live)), Ok(None));
    }

    #[test]
    fn current_quarter_uses_running_score() {
        let live = snapshot(GamePhase::In, 2, (10, 7), &[(ScoringPeriod::Q1, 7, 3)]);

        assert_eq!(digit_at(Team::Left, Checkpoint::Q2, Some(&live)), Ok(digit(0)));
        assert_eq!(digit_at(Team::Top, Checkpoint::Q2, Some(&live)), Ok(digit(7)));
    }

    #[test]
    fn closed_quarter_uses_summed_deltas() {
        let live = snapshot(GamePhase::In, 2, (10, 7), &[(ScoringPeriod::Q1, 7, 3)]);

        assert_eq!(digit_at(Team::Left, Checkpoint::Q1, Some(&live)), Ok(digit(7)));
        assert_eq!(digit_at(Team::Top, Checkpoint::Q1, Some(&live)), Ok(digit(3)));
    }

    #[test]
    fn unreached_quarters_are_unresolved() {
        let live = snapshot(GamePhase::In, 2, (10, 7), &[(ScoringPeriod::Q1, 7, 3)]);

        assert_eq!(digit_at(Team::Left, Checkpoint::Q3, Some(&live)), Ok(None));
        assert_eq!(digit_at(Team::Left, Checkpoint::Final, Some(&live)), Ok(None));
    }

    #[test]
    fn finished_overtime_game_resolves_all_checkpoints() {
        let live = finished_overtime();
        let read = |team, checkpoint| digit_at(team, checkpoint, Some(&live)).unwrap();

        assert_eq!(read(Team::Left, Checkpoint::Q1), digit(7));
        assert_eq!(read(Team::Top, Checkpoint::Q1), digit(3));
        assert_eq!(read(Team::Left, Checkpoint::Q2), digit(0));
        assert_eq!(read(Team::Top, Checkpoint::Q2), digit(3));
        assert_eq!(read(Team::Left, Checkpoint::Q3), digit(0));
        assert_eq!(read(Team::Top, Checkpoint::Q3), digit(3));
        assert_eq!(read(Team::Left, Checkpoint::Final), digit(3));
        assert_eq!(read(Team::Top, Checkpoint::Final), digit(0));
    }

    #[test]
    fn final_digit_agrees_with_summed_deltas() {
        let live = finished_overtime();

        for team in Team::ALL {
            let from_deltas = Digit::of_sum(live.quarter_scores.total(team));
            let from_score = Digit::of(live.score(team));
            let resolved = digit_at(team, Checkpoint::Final, Some(&live)).unwrap();

            assert_eq!(resolved, Some(from_deltas));
            assert_eq!(resolved, Some(from_score));
        }
    }

    #[test]
    fn deltas_above_score_abort_the_checkpoint() {
        let live = snapshot(GamePhase::In, 3, (6, 0), &[(ScoringPeriod::Q1, 7, 0)]);

        assert_eq!(
            digit_at(Team::Left, Checkpoint::Q1, Some(&live)),
            Err(SquaresError::InvalidScoreState(ScoreFault::DeltasExceedScore {
                team: Team::Left,
                checkpoint: Checkpoint::Q1,
                summed: 7,
                score: 6,
            }))
        );
        assert_eq!(digit_at(Team::Top, Checkpoint::Q1, Some(&live)), Ok(digit(0)));
    }

    #[test]
    fn finished_game_with_mismatched_deltas_aborts_final() {
        let live = snapshot(GamePhase::Post, 4, (24, 0), &[(ScoringPeriod::Q1, 7, 0)]);

        assert!(matches!(
            digit_at(Team::Left, Checkpoint::Final, Some(&live)),
            Err(SquaresError::InvalidScoreState(ScoreFault::DeltaMismatch { .. }))
        ));
    }

    #[test]
    fn finished_game_with_missing_deltas_aborts_every_quarter() {
        let live = snapshot(GamePhase::Post, 4, (24, 20), &[(ScoringPeriod::Q1, 7, 3)]);

        for checkpoint in [Checkpoint::Q1, Checkpoint::Q2, Checkpoint::Q3] {
            assert_eq!(
                digit_at(Team::Left, checkpoint, Some(&live)),
                Err(SquaresError::InvalidScoreState(ScoreFault::DeltaMismatch {
                    team: Team::Left,
                    summed: 7,
                    score: 24,
                }))
            );
        }
    }

    #[test]
    fn digits_stay_in_range() {
        for left in [0, 9, 10, 99, 255, Points::MAX] {
            let live = snapshot(GamePhase::In, 4, (left, 0), &[(ScoringPeriod::Q4, left, 0)]);
            for checkpoint in Checkpoint::ALL {
                if let Ok(Some(resolved)) = digit_at(Team::Left, checkpoint, Some(&live)) {
                    assert!(resolved.get() < 10);
                }
            }
        }
    }
}
