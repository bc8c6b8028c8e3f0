use std::fmt::{self, Write};

use anyhow::Result;
use serde::Serialize;
use squares_core::{
    Board, BoardCoverage, CheckpointStatus, GridPos, Holding, LiveScoreState, ParticipantStats,
    PayoutLine, Payouts, Projection, Resolution, Team,
};
use squares_protocol::GameState;

use crate::config::Format;

/// Command output, printable as text or JSON.
pub trait Report: Serialize {
    fn write_text(&self, out: &mut String) -> fmt::Result;
}

pub fn render(report: &impl Report, format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(report)?),
        Format::Text => {
            let mut out = String::new();
            report.write_text(&mut out)?;
            Ok(out)
        }
    }
}

fn status_label(status: CheckpointStatus) -> &'static str {
    match status {
        CheckpointStatus::Awaiting => "awaiting",
        CheckpointStatus::Blank => "blank",
        CheckpointStatus::Live => "live",
        CheckpointStatus::Locked => "locked",
    }
}

fn holding_label(holding: Holding) -> &'static str {
    match holding {
        Holding::Winner => "winner",
        Holding::CurrentHolder => "current holder",
        Holding::CurrentScore => "current score",
    }
}

fn owner_list(owners: &[String]) -> String {
    if owners.is_empty() {
        "(open)".into()
    } else {
        owners.join(", ")
    }
}

fn write_scoreline(
    out: &mut String,
    settings: &GameState,
    live: Option<&LiveScoreState>,
) -> fmt::Result {
    let (left, top) = (settings.team_abbr(Team::Left), settings.team_abbr(Team::Top));
    match live {
        None => writeln!(out, "{left} vs {top}, no score yet"),
        Some(live) if live.is_manual => writeln!(
            out,
            "{left} {} - {top} {} (manual)",
            live.left_score, live.top_score
        ),
        Some(live) => writeln!(
            out,
            "{left} {} - {top} {}, period {} ({:?})",
            live.left_score, live.top_score, live.period, live.phase
        ),
    }
}

#[derive(Serialize)]
pub struct ResolveReport<'a> {
    #[serde(skip)]
    pub settings: &'a GameState,
    #[serde(skip)]
    pub board: &'a Board,
    pub live: Option<&'a LiveScoreState>,
    #[serde(flatten)]
    pub resolution: &'a Resolution,
}

impl Report for ResolveReport<'_> {
    fn write_text(&self, out: &mut String) -> fmt::Result {
        write_scoreline(out, self.settings, self.live)?;
        for outcome in self.resolution.outcomes() {
            write!(
                out,
                "{:<6}{:<10}",
                outcome.checkpoint.label(),
                status_label(outcome.status)
            )?;
            match (outcome.key, outcome.cell) {
                (Some(key), Some(cell)) => write!(
                    out,
                    "{key}  #{}  {}",
                    cell.square_number(),
                    owner_list(self.board.owners(cell))
                )?,
                (Some(key), None) => write!(out, "{key}  axes not drawn")?,
                _ => {}
            }
            if let Some(fault) = &outcome.fault {
                write!(out, "  error: {fault}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct ProjectionRow {
    #[serde(flatten)]
    pub projection: Projection,
    pub owners: Vec<String>,
    pub square: Option<usize>,
    /// Prize of the checkpoint the projection was looked up on.
    pub wins: u32,
}

impl ProjectionRow {
    pub fn new(board: &Board, payouts: &Payouts, projection: Projection) -> Self {
        let owners = projection
            .cell
            .map(|cell| board.owners(cell).to_vec())
            .unwrap_or_default();
        Self {
            projection,
            owners,
            square: projection.cell.map(GridPos::square_number),
            wins: payouts.amount(projection.checkpoint),
        }
    }
}

#[derive(Serialize)]
pub struct ProjectReport<'a> {
    #[serde(skip)]
    pub settings: &'a GameState,
    pub team: Team,
    pub live: Option<&'a LiveScoreState>,
    pub projections: Vec<ProjectionRow>,
}

impl Report for ProjectReport<'_> {
    fn write_text(&self, out: &mut String) -> fmt::Result {
        write_scoreline(out, self.settings, self.live)?;
        writeln!(out, "If {} scores:", self.settings.team_name(self.team))?;
        for row in &self.projections {
            write!(out, "  {:<18}{}  ", row.projection.play.label(), row.projection.key)?;
            match row.square {
                Some(square) => writeln!(
                    out,
                    "#{square}  {}  wins ${} ({})",
                    owner_list(&row.owners),
                    row.wins,
                    row.projection.checkpoint
                )?,
                None => writeln!(out, "axes not drawn")?,
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct SummaryReport<'a> {
    #[serde(skip)]
    pub settings: &'a GameState,
    pub live: Option<&'a LiveScoreState>,
    pub lines: Vec<PayoutLine>,
    pub total: u32,
    pub coverage: BoardCoverage,
    pub participants: usize,
    pub player: Option<ParticipantStats>,
}

impl Report for SummaryReport<'_> {
    fn write_text(&self, out: &mut String) -> fmt::Result {
        if !self.settings.title.is_empty() {
            writeln!(out, "{}", self.settings.title)?;
        }
        write_scoreline(out, self.settings, self.live)?;
        for line in &self.lines {
            write!(
                out,
                "{:<6}${:<6}{:<10}",
                line.checkpoint.label(),
                line.amount,
                status_label(line.status)
            )?;
            if let (Some(holding), Some(key)) = (line.holding, line.key) {
                write!(out, "{}: {key}", holding_label(holding))?;
                match line.square {
                    Some(square) => write!(out, "  #{square}  {}", owner_list(&line.owners))?,
                    None => write!(out, "  axes not drawn")?,
                }
            }
            writeln!(out)?;
        }
        writeln!(out, "Pot: ${}", self.total)?;
        writeln!(
            out,
            "Board: {} filled, {} open ({}%), {} participant(s)",
            self.coverage.filled, self.coverage.open, self.coverage.percent, self.participants
        )?;

        if let Some(player) = &self.player {
            let squares = player
                .squares
                .iter()
                .map(|pos| format!("#{}", pos.square_number()))
                .collect::<Vec<_>>();
            writeln!(
                out,
                "{:?}: {} square(s) {}, ${} in",
                player.query,
                squares.len(),
                squares.join(" "),
                player.investment
            )?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct ValidateReport {
    pub valid: bool,
    pub problems: Vec<String>,
}

impl Report for ValidateReport {
    fn write_text(&self, out: &mut String) -> fmt::Result {
        if self.valid {
            return writeln!(out, "ok");
        }
        for problem in &self.problems {
            writeln!(out, "error: {problem}")?;
        }
        Ok(())
    }
}
