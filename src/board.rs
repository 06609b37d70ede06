//! Array-backed Connect 4 position

use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};
use thiserror::Error;

use std::io::Write;
use std::str::FromStr;

use crate::{HEIGHT, WIDTH};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Reasons a move sequence cannot be turned into a [`Board`]
///
/// `index` is the 0-based position of the offending character, which is also
/// the number of moves that were applied before the failure.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum InvalidMove {
    #[error("could not parse '{character}' at position {index} as a valid move")]
    InvalidCharacter { index: usize, character: char },
    #[error("invalid move at position {index}, column {column} full")]
    ColumnFull { index: usize, column: usize },
    #[error("invalid position, column {column} at position {index} wins the game")]
    WinningMove { index: usize, column: usize },
}

impl InvalidMove {
    /// The number of moves successfully applied before the failure
    pub fn moves_applied(&self) -> usize {
        match *self {
            InvalidMove::InvalidCharacter { index, .. }
            | InvalidMove::ColumnFull { index, .. }
            | InvalidMove::WinningMove { index, .. } => index,
        }
    }
}

/// A Connect 4 position
///
/// Boards are plain values: [`Board::apply`] returns the successor position and
/// leaves `self` untouched. The player to move is derived from the parity of the
/// move count, player one moving on even plies.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Board {
    // cells are stored column by column, bottom-to-top
    cells: [[Cell; HEIGHT]; WIDTH],
    heights: [usize; WIDTH],
    num_moves: usize,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; HEIGHT]; WIDTH],
            heights: [0; WIDTH],
            num_moves: 0,
        }
    }

    /// Builds a position from a string of 1-indexed column digits, e.g. `"4453"`
    ///
    /// Fails on the first character that is not a column, names a full column,
    /// or would complete an alignment: only undecided positions are accepted.
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self, InvalidMove> {
        let mut board = Self::new();

        for (index, column_char) in moves.as_ref().trim().chars().enumerate() {
            let column = match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => column - 1,
                _ => {
                    return Err(InvalidMove::InvalidCharacter {
                        index,
                        character: column_char,
                    })
                }
            };
            if !board.playable(column) {
                return Err(InvalidMove::ColumnFull {
                    index,
                    column: column + 1,
                });
            }
            if board.check_winning_move(column) {
                return Err(InvalidMove::WinningMove {
                    index,
                    column: column + 1,
                });
            }
            board.play(column);
        }
        Ok(board)
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    /// The cell at a 0-indexed column and row, row 0 being the bottom
    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.cells[column][row]
    }

    /// The tile the player to move will place
    pub fn current_player(&self) -> Cell {
        if self.num_moves % 2 == 0 {
            Cell::PlayerOne
        } else {
            Cell::PlayerTwo
        }
    }

    pub fn is_full(&self) -> bool {
        self.num_moves == WIDTH * HEIGHT
    }

    pub fn playable(&self, column: usize) -> bool {
        self.heights[column] < HEIGHT
    }

    /// Returns the position after the current player drops a tile in `column`
    ///
    /// The column must be playable. Winning moves are allowed here, deciding
    /// what they are worth is left to the caller.
    pub fn apply(&self, column: usize) -> Self {
        let mut next = *self;
        next.play(column);
        next
    }

    fn play(&mut self, column: usize) {
        debug_assert!(self.playable(column), "column {} is full", column);
        self.cells[column][self.heights[column]] = self.current_player();
        self.heights[column] += 1;
        self.num_moves += 1;
    }

    /// Whether the current player completes an alignment by playing `column`
    ///
    /// Must not be called on a full column.
    pub fn check_winning_move(&self, column: usize) -> bool {
        debug_assert!(self.playable(column), "column {} is full", column);
        let player = self.current_player();
        let height = self.heights[column];

        // check vertical alignment
        if height >= 3
            && self.cells[column][height - 1] == player
            && self.cells[column][height - 2] == player
            && self.cells[column][height - 3] == player
        {
            return true;
        }

        // check horizontal (dy_dx = 0) and both diagonal alignments
        for dy_dx in -1i32..=1 {
            let mut run = 0;
            for dx in [-1i32, 1].iter() {
                let mut x = column as i32 + dx;
                let mut y = height as i32 + dx * dy_dx;
                while x >= 0
                    && x < WIDTH as i32
                    && y >= 0
                    && y < HEIGHT as i32
                    && self.cells[x as usize][y as usize] == player
                {
                    x += dx;
                    y += dx * dy_dx;
                    run += 1;
                }
            }
            if run >= 3 {
                return true;
            }
        }

        false
    }

    /// The same position reflected left-to-right
    pub fn mirror(&self) -> Self {
        let mut mirrored = *self;
        mirrored.cells.reverse();
        mirrored.heights.reverse();
        mirrored
    }

    /// Draws the board, top row first, with the column numbers above it
    pub fn display<W: Write>(&self, out: &mut W) -> Result<()> {
        let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
        out.queue(PrintStyledContent(style(cols + "\n")))?;

        for row in (0..HEIGHT).rev() {
            for column in 0..WIDTH {
                out.queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match self.cells[column][row] {
                            Cell::PlayerOne => Color::Red,
                            Cell::PlayerTwo => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
            }
            out.queue(PrintStyledContent(style("\n")))?;
        }
        out.flush()?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Board {
    type Err = InvalidMove;

    fn from_str(moves: &str) -> Result<Self, Self::Err> {
        Self::from_moves(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board() {
        let board = Board::new();
        assert_eq!(board.num_moves(), 0);
        assert!((0..WIDTH).all(|column| board.playable(column)));
        assert_eq!(board.current_player(), Cell::PlayerOne);
    }

    #[test]
    fn apply_leaves_parent_untouched() {
        let board = Board::new();
        let next = board.apply(3);

        assert_eq!(board.num_moves(), 0);
        assert_eq!(board.height(3), 0);
        assert_eq!(next.num_moves(), 1);
        assert_eq!(next.height(3), 1);
        assert_eq!(next.cell(3, 0), Cell::PlayerOne);
        assert_eq!(next.current_player(), Cell::PlayerTwo);
    }

    #[test]
    fn heights_sum_to_move_count() -> Result<()> {
        let board = Board::from_moves("4444443333")?;
        let total: usize = (0..WIDTH).map(|column| board.height(column)).sum();
        assert_eq!(total, board.num_moves());
        assert_eq!(board.num_moves(), 10);
        Ok(())
    }

    #[test]
    fn stacked_columns() -> Result<()> {
        let board = Board::from_moves("121212")?;
        assert_eq!(board.num_moves(), 6);
        assert_eq!(board.height(0), 3);
        assert_eq!(board.height(1), 3);
        for row in 0..3 {
            assert_eq!(board.cell(0, row), Cell::PlayerOne);
            assert_eq!(board.cell(1, row), Cell::PlayerTwo);
        }
        Ok(())
    }

    #[test]
    fn rejects_winning_move() {
        let err = Board::from_moves("1212121").unwrap_err();
        assert_eq!(err, InvalidMove::WinningMove { index: 6, column: 1 });
        assert_eq!(err.moves_applied(), 6);
    }

    #[test]
    fn rejects_bad_characters() {
        assert_eq!(
            Board::from_moves("4480").unwrap_err(),
            InvalidMove::InvalidCharacter {
                index: 2,
                character: '8'
            }
        );
        assert_eq!(
            Board::from_moves("40").unwrap_err(),
            InvalidMove::InvalidCharacter {
                index: 1,
                character: '0'
            }
        );
        assert!(Board::from_moves("4a").is_err());
    }

    #[test]
    fn rejects_full_column() {
        let err = Board::from_moves("1111111").unwrap_err();
        assert_eq!(err, InvalidMove::ColumnFull { index: 6, column: 1 });
    }

    #[test]
    fn horizontal_and_diagonal_wins() -> Result<()> {
        // player one holds columns 1-3 on the bottom row
        let board = Board::from_moves("112233")?;
        assert!(board.check_winning_move(3));
        assert!(!board.check_winning_move(4));

        // ...O O _ O... holes count too
        let board = Board::from_moves("1122447")?;
        assert_eq!(board.current_player(), Cell::PlayerTwo);
        let board = board.apply(6);
        assert!(board.check_winning_move(2));

        // player one builds a rising diagonal from the bottom left corner
        let board = Board::from_moves("1223343454")?;
        assert_eq!(board.current_player(), Cell::PlayerOne);
        assert_eq!(board.height(3), 3);
        assert!(board.check_winning_move(3));
        assert!(!board.check_winning_move(0));
        Ok(())
    }

    #[test]
    fn falling_diagonal() -> Result<()> {
        // mirror image of a rising diagonal threat
        let rising = Board::from_moves("1223343")?;
        let falling = Board::from_moves("7665545")?;
        assert_eq!(rising.mirror(), falling);
        for column in 0..WIDTH {
            assert_eq!(
                rising.check_winning_move(column),
                falling.check_winning_move(WIDTH - 1 - column)
            );
        }
        Ok(())
    }

    #[test]
    fn mirror_round_trip() -> Result<()> {
        let board = Board::from_moves("1234567")?;
        assert_eq!(board.mirror().cell(6, 0), Cell::PlayerOne);
        assert_eq!(board.mirror().mirror(), board);
        Ok(())
    }

    #[test]
    fn display_writes_every_row() -> Result<()> {
        let mut out = Vec::new();
        Board::from_moves("44")?.display(&mut out)?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("1234567"));
        assert_eq!(text.matches('O').count(), WIDTH * HEIGHT);
        Ok(())
    }
}
