//! Command-line front end: solve FFO-style positions and print the results.

use clap::Parser;
use derive_more::{Display, Error, From};
use endgame_board::test_utils::ffo::{self, FFOPosition, LoadFFOError};
use endgame_board::{Game, IllegalMoveError};
use endgame_solver::{sample, sample_observed, CsvTrace, ExactSolution, FastSolver, Solver};
use log::{info, warn, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

type TraceFile = CsvTrace<BufWriter<File>>;

#[derive(Parser, Debug)]
#[command(version, about = "Solve Othello endgame positions exactly.")]
struct Args {
    /// Write one CSV record per searched or sampled node to FILE.
    #[arg(long, value_name = "FILE", conflicts_with = "fast")]
    trace: Option<PathBuf>,

    /// Only decide between win, loss and draw.
    #[arg(long, conflicts_with_all = ["sample", "fast"])]
    wld: bool,

    /// Use the region-parity solver instead of the default search.
    #[arg(long, conflicts_with = "sample")]
    fast: bool,

    /// Play N random games from each position instead of searching.
    #[arg(long, value_name = "N")]
    sample: Option<usize>,

    /// Seed for --sample. Defaults to OS entropy.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,

    /// Load positions from an FFO suite file: one `<board> <X|O> <move>
    /// <score>` line per position. Solved scores are checked against the
    /// file's.
    #[arg(long, short, value_name = "FILE")]
    file: Vec<PathBuf>,

    /// Positions as FFO lines, `<64-char board> <X|O> ...`; fields after the
    /// colour to move are ignored.
    #[arg(value_name = "POSITION", required_unless_present = "file")]
    positions: Vec<String>,
}

#[derive(Debug, Display, Error, From)]
enum CliError {
    #[display(fmt = "cannot parse position: {}", _0)]
    Position(LoadFFOError),
    #[display(fmt = "cannot load {}: {}", "path.display()", source)]
    #[from(ignore)]
    File { path: PathBuf, source: LoadFFOError },
    #[display(fmt = "cannot write trace: {}", _0)]
    Trace(io::Error),
    #[display(fmt = "principal variation does not replay: {}", _0)]
    IllegalMove(IllegalMoveError),
    #[display(fmt = "{} positions disagree with their expected score", count)]
    #[from(ignore)]
    Mismatch { count: usize },
}

/// A position to solve, with its suite entry when it came from a file.
struct Job {
    game: Game,
    expected: Option<FFOPosition>,
}

fn init_logging(level: LevelFilter) {
    // Logging is best-effort; the results still go to stdout.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn main() -> Result<(), CliError> {
    let args = Args::parse();
    init_logging(args.log_level);

    let jobs = load_jobs(&args)?;

    if let Some(repeats) = args.sample {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        return match &args.trace {
            Some(path) => {
                let mut trace = open_trace(path)?;
                let result = solve_all(&jobs, false, |game| {
                    sample_observed(game, repeats, &mut rng, &mut trace)
                });
                finish_trace(trace, path)?;
                result
            }
            None => solve_all(&jobs, false, |game| sample(game, repeats, &mut rng)),
        };
    }

    if args.fast {
        let mut solver = FastSolver::new();
        return solve_all(&jobs, true, |game| solver.solve(game));
    }

    let exact = !args.wld;
    match &args.trace {
        Some(path) => {
            let mut solver = Solver::with_observer(open_trace(path)?);
            let result = solve_all(&jobs, exact, |game| {
                if exact {
                    solver.solve(game)
                } else {
                    solver.solve_window(game, -1, 1)
                }
            });
            finish_trace(solver.into_observer(), path)?;
            result
        }
        None => {
            let mut solver = Solver::new();
            solve_all(&jobs, exact, |game| {
                if exact {
                    solver.solve(game)
                } else {
                    solver.solve_window(game, -1, 1)
                }
            })
        }
    }
}

fn load_jobs(args: &Args) -> Result<Vec<Job>, CliError> {
    let mut jobs = Vec::new();
    for line in &args.positions {
        jobs.push(Job {
            game: ffo::parse_game(line)?,
            expected: None,
        });
    }

    for path in &args.file {
        let positions = ffo::load_ffo_positions(path).map_err(|source| CliError::File {
            path: path.clone(),
            source,
        })?;
        info!("loaded {} positions from {}", positions.len(), path.display());
        jobs.extend(positions.into_iter().map(|position| Job {
            game: position.game,
            expected: Some(position),
        }));
    }
    Ok(jobs)
}

fn open_trace(path: &Path) -> Result<TraceFile, CliError> {
    Ok(CsvTrace::new(BufWriter::new(File::create(path)?)))
}

fn finish_trace(trace: TraceFile, path: &Path) -> Result<(), CliError> {
    let records = trace.records();
    trace.finish()?;
    info!("wrote {} trace records to {}", records, path.display());
    Ok(())
}

/// Solve every job, print the results and compare exact outcomes with the
/// expected suite scores.
fn solve_all<F>(jobs: &[Job], exact: bool, mut solve: F) -> Result<(), CliError>
where
    F: FnMut(Game) -> ExactSolution<Game>,
{
    let mut mismatches = 0;
    for job in jobs {
        let start = Instant::now();
        let solution = solve(job.game);
        report(&solution, start)?;

        if let (true, Some(expected)) = (exact, &job.expected) {
            if solution.outcome == expected.score {
                info!(
                    "outcome matches the expected {:+}; best move {}, suite gives {}",
                    expected.score,
                    solution.best_move(),
                    expected.best_move
                );
            } else {
                mismatches += 1;
                warn!(
                    "outcome {:+} differs from the expected {:+}",
                    solution.outcome, expected.score
                );
            }
        }
    }

    if mismatches > 0 {
        return Err(CliError::Mismatch { count: mismatches });
    }
    Ok(())
}

fn report(solution: &ExactSolution<Game>, start: Instant) -> Result<(), CliError> {
    let elapsed = start.elapsed();
    let end = solution
        .principal_variation
        .iter()
        .try_fold(solution.solved_position, |game, &mv| game.apply_move(mv))?;

    println!("{}", solution.solved_position);
    println!("{}", solution);
    if end.is_finished() {
        match end.winner() {
            Some(player) => println!("Winner: {}", player),
            None => println!("Draw"),
        }
    }
    println!();

    info!(
        "{} nodes in {:.3?} ({:.0} nodes/s)",
        solution.node_count,
        elapsed,
        solution.node_count as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    Ok(())
}
