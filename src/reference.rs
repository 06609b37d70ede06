//! Unpruned negamax engines
//!
//! These visit every node of the game tree below a position, so they are only
//! practical close to the end of a game. Their scores must always agree with
//! [`Solver`](crate::solver::Solver), which makes them useful as oracles.

use crate::{
    board::Board,
    solver::{immediate_win_score, move_order, Search},
    HEIGHT, WIDTH,
};

fn negamax(board: &Board, order: &[usize; WIDTH], node_count: &mut u64) -> i32 {
    *node_count += 1;

    if board.is_full() {
        return 0;
    }

    for column in 0..WIDTH {
        if board.playable(column) && board.check_winning_move(column) {
            return immediate_win_score(board.num_moves());
        }
    }

    // lower than any reachable score
    let mut best_score = -((WIDTH * HEIGHT) as i32);
    for &column in order.iter() {
        if board.playable(column) {
            let score = -negamax(&board.apply(column), order, node_count);
            if score > best_score {
                best_score = score;
            }
        }
    }
    best_score
}

/// Plain negamax, columns visited left to right
#[derive(Clone, Debug, Default)]
pub struct PlainNegamax {
    node_count: u64,
}

impl PlainNegamax {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Search for PlainNegamax {
    fn solve(&mut self, board: &Board) -> i32 {
        self.node_count = 0;
        let mut order = [0; WIDTH];
        for (i, column) in order.iter_mut().enumerate() {
            *column = i;
        }
        negamax(board, &order, &mut self.node_count)
    }

    fn node_count(&self) -> u64 {
        self.node_count
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

/// Negamax visiting columns center-first, without pruning
#[derive(Clone, Debug, Default)]
pub struct OrderedNegamax {
    node_count: u64,
}

impl OrderedNegamax {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Search for OrderedNegamax {
    fn solve(&mut self, board: &Board) -> i32 {
        self.node_count = 0;
        negamax(board, &move_order(), &mut self.node_count)
    }

    fn node_count(&self) -> u64 {
        self.node_count
    }

    fn name(&self) -> &'static str {
        "ordered"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn immediate_win() -> Result<()> {
        let board = Board::from_moves("121212")?;
        let mut plain = PlainNegamax::new();
        assert_eq!(plain.solve(&board), 18);
        // the win is found without descending
        assert_eq!(plain.node_count(), 1);
        Ok(())
    }

    #[test]
    fn counters_reset_between_solves() -> Result<()> {
        let board = Board::from_moves("121212")?;
        let mut ordered = OrderedNegamax::new();
        ordered.solve(&board);
        ordered.solve(&board);
        assert_eq!(ordered.node_count(), 1);
        Ok(())
    }
}
