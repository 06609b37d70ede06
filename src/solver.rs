//! An agent to solve the game of Connect 4

use crate::{board::Board, HEIGHT, WIDTH};

use std::cmp::Ordering;

/// The minimum possible score of a position
pub const MIN_SCORE: i32 = -((WIDTH * HEIGHT) as i32) / 2;
/// The maximum possible score of a postion
pub const MAX_SCORE: i32 = ((WIDTH * HEIGHT) as i32) / 2;

/// Returns the columns ordered from the middle outwards, left before right,
/// as the middle columns are often better moves
pub const fn move_order() -> [usize; WIDTH] {
    let mut move_order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        let offset = ((i + 1) / 2) as isize;
        let direction = 1 - 2 * (i % 2) as isize;
        move_order[i] = ((WIDTH / 2) as isize + direction * offset) as usize;
        i += 1;
    }
    move_order
}

/// Score of a position where the player to move wins with their next tile
pub fn immediate_win_score(num_moves: usize) -> i32 {
    ((WIDTH * HEIGHT + 1 - num_moves) / 2) as i32
}

/// Converts a position score to the number of plies until the game is decided,
/// counting the deciding ply
///
/// A draw is decided once the board fills up.
pub fn plies_to_outcome(num_moves: usize, score: i32) -> usize {
    // the ply index (number of earlier moves) of the winning tile for a given score
    let winning_ply = |score: i32, parity: usize| {
        let ply = WIDTH * HEIGHT + 1 - 2 * score as usize;
        if ply % 2 == parity {
            ply
        } else {
            ply - 1
        }
    };
    match score.cmp(&0) {
        Ordering::Equal => WIDTH * HEIGHT - num_moves,
        Ordering::Greater => winning_ply(score, num_moves % 2) + 1 - num_moves,
        Ordering::Less => winning_ply(-score, (num_moves + 1) % 2) + 1 - num_moves,
    }
}

/// Common shape of every search engine in this crate
pub trait Search {
    /// Calculates the exact score of a position, resetting the node counter
    fn solve(&mut self, board: &Board) -> i32;

    /// The number of nodes visited during the most recent [`Search::solve`]
    fn node_count(&self) -> u64;

    fn name(&self) -> &'static str;
}

/// An agent to solve Connect 4 positions
///
/// # Notes
/// Negamax with a fail-soft alpha-beta window, visiting columns center-first
/// (see [`move_order`]). There is no transposition table, so early positions
/// can take a very long time.
///
/// # Position Scoring
/// A position is scored from the point of view of the player to move. 0 is a
/// draw. A positive score means the player to move can force a win: winning
/// with their last possible tile scores 1, and every tile sooner adds one. A
/// negative score is the opposite of the opponent's winning score.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    node_count: u64,
}

impl Solver {
    pub fn new() -> Self {
        Self { node_count: 0 }
    }

    /// Calculates the exact score of `board` (see [Position Scoring])
    ///
    /// [Position Scoring]: #position-scoring
    pub fn solve(&mut self, board: &Board) -> i32 {
        self.node_count = 0;
        self.negamax(board, MIN_SCORE, MAX_SCORE)
    }

    /// The number of nodes searched by the most recent call to [`Solver::solve`]
    /// (for diagnostics only)
    pub fn node_count(&self) -> u64 {
        self.node_count
    }

    /// Performs game tree search inside the window `(alpha, beta)`
    ///
    /// If the true score is at most `alpha` the result is at most `alpha`, if
    /// it is at least `beta` the result is at least `beta`, otherwise it is the
    /// true score.
    ///
    /// # Panics
    /// Panics if `alpha >= beta`.
    pub fn negamax(&mut self, board: &Board, mut alpha: i32, mut beta: i32) -> i32 {
        assert!(
            alpha < beta,
            "empty search window ({}, {})",
            alpha,
            beta
        );
        self.node_count += 1;

        // check for draw
        if board.is_full() {
            return 0;
        }

        // check for next-move win for current player
        for column in 0..WIDTH {
            if board.playable(column) && board.check_winning_move(column) {
                return immediate_win_score(board.num_moves());
            }
        }

        // upper bound of score, as we cannot win immediately
        let max = ((WIDTH * HEIGHT - 1 - board.num_moves()) / 2) as i32;
        if beta > max {
            // clamp beta to calculated upper bound
            beta = max;
            // if the upper bound is lower than alpha, we can prune the exploration
            if alpha >= beta {
                return beta;
            }
        }

        // search the next level of the tree
        for &column in move_order().iter() {
            if !board.playable(column) {
                continue;
            }
            // the search window is flipped for the other player
            let score = -self.negamax(&board.apply(column), -beta, -alpha);
            // if a child node's score is better than beta, we can prune the tree
            // here because a perfect opponent will not pick this branch
            if score >= beta {
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}

impl Search for Solver {
    fn solve(&mut self, board: &Board) -> i32 {
        Solver::solve(self, board)
    }

    fn node_count(&self) -> u64 {
        Solver::node_count(self)
    }

    fn name(&self) -> &'static str {
        "alpha-beta"
    }
}
