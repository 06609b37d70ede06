use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::style::{style, Attribute, Color};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader};
use std::path::PathBuf;

use connect4_solver::{
    benchmark::{Measurement, Summary, TestCase},
    board::Board,
    reference::{OrderedNegamax, PlainNegamax},
    solver::{plies_to_outcome, Search, Solver},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Negamax with alpha-beta pruning and center-first ordering
    AlphaBeta,
    /// Negamax with center-first ordering, no pruning
    Ordered,
    /// Negamax over columns left to right, no pruning
    Plain,
}

/// Solves Connect 4 positions read one per line as `<moves> <expected score>`
/// and reports the score, node count and time of every solve
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File of test cases, read from stdin when missing
    input: Option<PathBuf>,

    /// Search engine to use
    #[arg(short, long, value_enum, default_value_t = Algorithm::AlphaBeta)]
    algorithm: Algorithm,

    /// Draw every position before solving it
    #[arg(long)]
    show_boards: bool,

    /// Show a progress bar (file input only)
    #[arg(short, long)]
    progress: bool,

    /// Only print the summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut engine: Box<dyn Search> = match args.algorithm {
        Algorithm::AlphaBeta => Box::new(Solver::new()),
        Algorithm::Ordered => Box::new(OrderedNegamax::new()),
        Algorithm::Plain => Box::new(PlainNegamax::new()),
    };
    info!("solving with the {} engine", engine.name());

    let mut lines: Vec<String> = match &args.input {
        Some(path) => {
            info!("reading test cases from {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("could not open {}", path.display()))?;
            read_lines(BufReader::new(file))?
        }
        None => read_lines(stdin().lock())?,
    };
    lines.retain(|line| !line.trim().is_empty());

    let progress = if args.progress && args.input.is_some() {
        let progress = ProgressBar::new(lines.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("Solving: {bar:40.cyan/blue} {pos}/{len} {msg} ~{eta} remaining")
                .progress_chars("█▓▒░  "),
        );
        progress
    } else {
        ProgressBar::hidden()
    };

    if !args.quiet {
        println!("input,score,nodes,time(ns)");
    }

    let mut summary = Summary::new();
    for line in lines.iter() {
        progress.inc(1);

        let test_case = match line.parse::<TestCase>() {
            Ok(test_case) => test_case,
            Err(err) => {
                warn!("{:#}", err);
                summary.skip();
                continue;
            }
        };
        let board = match Board::from_moves(&test_case.moves) {
            Ok(board) => board,
            Err(err) => {
                warn!("Invalid move: \"{}\" ({})", line, err);
                summary.skip();
                continue;
            }
        };

        if args.show_boards {
            board.display(&mut stdout())?;
        }

        let measurement = Measurement::take(engine.as_mut(), &board);
        summary.record(&measurement, test_case.expected);
        progress.set_message(&format!("{} mismatched", summary.mismatches));

        if measurement.score != test_case.expected {
            println!(
                "{} {} {} (expected {})",
                style("Expected scores didnt match.")
                    .attribute(Attribute::Bold)
                    .with(Color::Red),
                test_case.moves,
                measurement.score,
                test_case.expected
            );
        }
        if !args.quiet {
            println!(
                "{},{},{},{}",
                test_case.moves,
                measurement.score,
                measurement.node_count,
                measurement.time.as_nanos()
            );
        }
        debug!(
            "{}: decided in {} plies",
            test_case.moves,
            plies_to_outcome(board.num_moves(), measurement.score)
        );
    }
    progress.finish_and_clear();

    println!("{}", summary);
    Ok(())
}

fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    reader
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .context("failed to read test cases")
}
