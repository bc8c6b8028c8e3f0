use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use squares_core::{
    Board, BoardCoverage, LiveScoreState, Payouts, Team, participant_stats, participants,
    payout_lines, project_all, resolve,
};
use squares_protocol::{LiveGameData, PoolRecord};

use config::{Config, Format};
use render::*;

mod config;
mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Football squares pool resolver", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML file with defaults for price, payouts and format
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format, overrides the config file
    #[arg(short, long, value_enum, global = true)]
    format: Option<Format>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Inputs {
    /// Stored pool record (settings and board) as JSON
    #[arg(long)]
    pool: PathBuf,

    /// Live score feed snapshot as JSON
    #[arg(long)]
    live: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TeamArg {
    Left,
    Top,
}

impl From<TeamArg> for Team {
    fn from(team: TeamArg) -> Self {
        match team {
            TeamArg::Left => Team::Left,
            TeamArg::Top => Team::Top,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Checkpoint statuses, locked winners and the current leader
    Resolve {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Cells each scoring play would land on
    Project {
        #[command(flatten)]
        inputs: Inputs,

        /// Team that scores
        #[arg(long, value_enum)]
        team: TeamArg,
    },
    /// Payouts, board coverage and a player's squares
    Summary {
        #[command(flatten)]
        inputs: Inputs,

        /// Case-insensitive part of a player's name
        #[arg(long)]
        player: Option<String>,

        /// Price of one square, overrides the config file
        #[arg(long)]
        price: Option<u32>,
    },
    /// Check the board and the score snapshot, failing on any problem
    Validate {
        #[command(flatten)]
        inputs: Inputs,
    },
}

struct Loaded {
    pool: PoolRecord,
    board: Board,
    live: Option<LiveScoreState>,
}

impl Loaded {
    /// Pool payouts, falling back to the config file and then the defaults.
    fn payouts(&self, config: &Config) -> Payouts {
        self.pool.settings.payouts.or(config.payouts).unwrap_or_default()
    }
}

fn read(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Could not read {what} {}", path.display()))
}

fn load(inputs: &Inputs) -> Result<Loaded> {
    let pool = PoolRecord::from_json(&read(&inputs.pool, "pool")?)
        .with_context(|| format!("Invalid pool {}", inputs.pool.display()))?;
    let board = pool.board().context("Invalid board")?;

    let feed = match &inputs.live {
        Some(path) => Some(
            LiveGameData::from_json(&read(path, "live feed")?)
                .with_context(|| format!("Invalid live feed {}", path.display()))?,
        ),
        None => None,
    };
    let live = pool
        .settings
        .effective_live(feed.as_ref())
        .context("Invalid score snapshot")?;

    Ok(Loaded { pool, board, live })
}

/// Board and snapshot problems, strict score consistency included.
fn problems(loaded: &Loaded) -> Vec<String> {
    let mut problems = Vec::new();
    if let Err(err) = loaded.board.validate() {
        problems.push(err.to_string());
    }
    if let Some(live) = &loaded.live {
        if let Err(err) = live.check_consistency() {
            problems.push(err.to_string());
        }
    }
    let resolution = resolve(&loaded.board, loaded.live.as_ref());
    for (checkpoint, fault) in resolution.faults() {
        let problem = format!("{checkpoint}: {fault}");
        if !problems.iter().any(|known| problem.ends_with(known.as_str())) {
            problems.push(problem);
        }
    }
    problems
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let format = args.format.unwrap_or(config.format);

    let output = match &args.command {
        Command::Resolve { inputs } => {
            let loaded = load(inputs)?;
            let resolution = resolve(&loaded.board, loaded.live.as_ref());
            render(
                &ResolveReport {
                    settings: &loaded.pool.settings,
                    board: &loaded.board,
                    live: loaded.live.as_ref(),
                    resolution: &resolution,
                },
                format,
            )?
        }
        Command::Project { inputs, team } => {
            let loaded = load(inputs)?;
            let team = Team::from(*team);
            let payouts = loaded.payouts(&config);
            let projections = project_all(&loaded.board, team, loaded.live.as_ref())
                .into_iter()
                .map(|projection| ProjectionRow::new(&loaded.board, &payouts, projection))
                .collect();
            render(
                &ProjectReport {
                    settings: &loaded.pool.settings,
                    team,
                    live: loaded.live.as_ref(),
                    projections,
                },
                format,
            )?
        }
        Command::Summary {
            inputs,
            player,
            price,
        } => {
            let loaded = load(inputs)?;
            let payouts = loaded.payouts(&config);
            let price = price.unwrap_or(config.price_per_square);
            let resolution = resolve(&loaded.board, loaded.live.as_ref());
            render(
                &SummaryReport {
                    settings: &loaded.pool.settings,
                    live: loaded.live.as_ref(),
                    lines: payout_lines(&loaded.board, &resolution, &payouts),
                    total: payouts.total(),
                    coverage: BoardCoverage::of(&loaded.board),
                    participants: participants(&loaded.board).len(),
                    player: player
                        .as_deref()
                        .and_then(|query| participant_stats(&loaded.board, query, price)),
                },
                format,
            )?
        }
        Command::Validate { inputs } => {
            let loaded = load(inputs)?;
            let problems = problems(&loaded);
            let report = ValidateReport {
                valid: problems.is_empty(),
                problems,
            };
            print!("{}", render(&report, format)?);
            if !report.valid {
                bail!("{} problem(s) found", report.problems.len());
            }
            return Ok(());
        }
    };

    print!("{output}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("{args:?}");

    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use squares_core::GamePhase;
    use squares_protocol::GameState;

    #[test]
    fn verify_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_project_command() {
        let args = Args::try_parse_from([
            "squares", "-v", "--format", "json", "project", "--pool", "pool.json", "--team",
            "top",
        ])
        .unwrap();

        assert_eq!(args.format, Some(Format::Json));
        assert!(matches!(
            args.command,
            Command::Project {
                team: TeamArg::Top,
                ..
            }
        ));
    }

    #[test]
    fn inconsistent_feed_is_a_problem() {
        let live = LiveScoreState {
            left_score: 3,
            top_score: 0,
            period: 2,
            phase: GamePhase::In,
            ..Default::default()
        };
        let loaded = Loaded {
            pool: PoolRecord {
                settings: GameState::default(),
                ..Default::default()
            },
            board: Board::default(),
            live: Some(live),
        };

        let problems = problems(&loaded);

        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("deltas sum to 0"));
    }

    #[test]
    fn pool_payouts_win_over_config() {
        let mut loaded = Loaded {
            pool: PoolRecord::default(),
            board: Board::default(),
            live: None,
        };
        let config = Config {
            payouts: Some(Payouts {
                final_score: 500,
                ..Default::default()
            }),
            ..Default::default()
        };

        assert_eq!(loaded.payouts(&Config::default()), Payouts::default());
        assert_eq!(loaded.payouts(&config).final_score, 500);

        loaded.pool.settings.payouts = Some(Payouts {
            final_score: 300,
            ..Default::default()
        });
        assert_eq!(loaded.payouts(&config).final_score, 300);
    }

    #[test]
    fn clean_pool_has_no_problems() {
        let loaded = Loaded {
            pool: PoolRecord::default(),
            board: Board::default(),
            live: None,
        };

        assert!(problems(&loaded).is_empty());
    }
}
