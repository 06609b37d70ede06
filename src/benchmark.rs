//! Benchmark test cases and timing statistics

use anyhow::{anyhow, Context, Result};

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::{board::Board, solver::Search};

/// One benchmark line: a move sequence and its known score
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestCase {
    pub moves: String,
    pub expected: i32,
}

impl FromStr for TestCase {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut test_data = line.split_whitespace();
        let moves = test_data
            .next()
            .ok_or_else(|| anyhow!("invalid test data: empty line"))?;
        let expected = test_data
            .next()
            .ok_or_else(|| anyhow!("invalid test data: no expected score in '{}'", line))?
            .parse::<i32>()
            .with_context(|| format!("invalid test data: bad expected score in '{}'", line))?;
        Ok(Self {
            moves: moves.to_string(),
            expected,
        })
    }
}

/// The result of solving a single position
#[derive(Clone, Debug)]
pub struct Measurement {
    pub score: i32,
    pub node_count: u64,
    pub time: Duration,
}

impl Measurement {
    /// Solves `board` with `engine` and times it
    pub fn take<S: Search + ?Sized>(engine: &mut S, board: &Board) -> Self {
        let start_time = Instant::now();
        let score = engine.solve(board);
        let time = start_time.elapsed();
        Self {
            score,
            node_count: engine.node_count(),
            time,
        }
    }
}

/// Aggregate statistics over a benchmark run
#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub solved: u64,
    pub total_nodes: u64,
    pub total_time: Duration,
    pub mismatches: u64,
    pub skipped: u64,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, measurement: &Measurement, expected: i32) {
        self.solved += 1;
        self.total_nodes += measurement.node_count;
        self.total_time += measurement.time;
        if measurement.score != expected {
            self.mismatches += 1;
        }
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    /// Mean solve time, `None` if nothing was solved
    pub fn mean_time(&self) -> Option<Duration> {
        match self.solved {
            0 => None,
            n => Some(self.total_time / n as u32),
        }
    }

    pub fn mean_nodes(&self) -> Option<u64> {
        match self.solved {
            0 => None,
            n => Some(self.total_nodes / n),
        }
    }

    /// Thousands of nodes searched per second over the whole run
    pub fn knodes_per_second(&self) -> Option<f64> {
        let secs = self.total_time.as_secs_f64();
        if self.solved == 0 || secs == 0.0 {
            None
        } else {
            Some(self.total_nodes as f64 / (1000.0 * secs))
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Puzzles solved = {}", self.solved)?;
        writeln!(f, "Puzzles skipped = {}", self.skipped)?;
        writeln!(f, "Mismatched scores = {}", self.mismatches)?;
        writeln!(f, "Total time (ms) = {}", self.total_time.as_millis())?;
        write!(f, "Total nodes = {}", self.total_nodes)?;
        if let (Some(time), Some(nodes)) = (self.mean_time(), self.mean_nodes()) {
            writeln!(f)?;
            writeln!(f, "Average time to solve = {}us", time.as_micros())?;
            write!(f, "Average number of positions = {}", nodes)?;
        }
        if let Some(knodes) = self.knodes_per_second() {
            writeln!(f)?;
            write!(f, "K-Nodes per second = {:.0}", knodes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Solver;

    #[test]
    fn parse_test_case() -> Result<()> {
        let case: TestCase = "121212 18".parse()?;
        assert_eq!(
            case,
            TestCase {
                moves: "121212".to_string(),
                expected: 18
            }
        );

        let case: TestCase = "  4455\t-3 trailing".parse()?;
        assert_eq!(case.moves, "4455");
        assert_eq!(case.expected, -3);
        Ok(())
    }

    #[test]
    fn malformed_test_cases() {
        assert!("".parse::<TestCase>().is_err());
        assert!("121212".parse::<TestCase>().is_err());
        assert!("121212 eighteen".parse::<TestCase>().is_err());
    }

    #[test]
    fn summary_statistics() -> Result<()> {
        let mut summary = Summary::new();
        assert!(summary.mean_time().is_none());
        assert!(summary.knodes_per_second().is_none());

        let board = Board::from_moves("121212")?;
        let mut solver = Solver::new();
        let measurement = Measurement::take(&mut solver, &board);
        assert_eq!(measurement.score, 18);
        assert_eq!(measurement.node_count, 1);

        summary.record(&measurement, 18);
        summary.record(
            &Measurement {
                score: 0,
                node_count: 9,
                time: Duration::from_millis(2),
            },
            1,
        );
        summary.skip();

        assert_eq!(summary.solved, 2);
        assert_eq!(summary.total_nodes, 10);
        assert_eq!(summary.mismatches, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.mean_nodes(), Some(5));
        assert!(summary.knodes_per_second().is_some());
        assert!(summary.to_string().contains("Puzzles solved = 2"));
        Ok(())
    }
}
