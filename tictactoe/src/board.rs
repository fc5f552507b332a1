use crate::error::{Error, Result};
use crate::players::SelectionPolicy;
use itertools::Itertools;
use ndarray::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref};
use tracing::{debug, trace};

/// Side marker owning a square. `Empty` marks an unplayed square.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Marks {
    #[serde(rename = "X")]
    Cross,
    #[serde(rename = "O")]
    Nought,
    #[serde(rename = "-")]
    Empty,
}

impl Marks {
    pub fn other(self) -> Self {
        match self {
            Self::Cross => Marks::Nought,
            Self::Nought => Marks::Cross,
            Self::Empty => Marks::Empty,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Self::Cross => 'X',
            Self::Nought => 'O',
            Self::Empty => '-',
        }
    }
    pub fn is_empty(self) -> bool {
        self == Marks::Empty
    }
}

impl fmt::Display for Marks {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The 3x3 grid, indexed `[[row, col]]`.
///
/// Read access goes through `Deref` to the underlying array; squares are only
/// ever written by [`Game::make_move`], so a played square never reverts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Array2<Marks>,
}

impl Deref for Board {
    type Target = Array2<Marks>;
    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (a, b, c) in self.cells.iter().tuples() {
            writeln!(f, "{} {} {}", a, b, c)?;
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Board {
            cells: Array::from_elem((3, 3), Marks::Empty),
        }
    }

    /// Builds a board from explicit rows. No legality checks are made, so
    /// boards no real game could reach are accepted.
    pub fn from_rows(rows: [[Marks; 3]; 3]) -> Self {
        Board { cells: arr2(&rows) }
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .indexed_iter()
            .filter(|(_index, value)| value.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|value| !value.is_empty())
    }

    /// True if any row, column or diagonal is entirely `mark`.
    pub fn has_line(&self, mark: Marks) -> bool {
        if mark.is_empty() {
            return false;
        }
        let full = |line: ArrayView1<Marks>| line.iter().all(|value| *value == mark);
        self.cells.rows().into_iter().any(full)
            || self.cells.columns().into_iter().any(full)
            || full(self.cells.diag())
            || (0..3).all(|i| self.cells[[i, 2 - i]] == mark)
    }
}

/// Outcome snapshot derived from the board on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub draw: bool,
    pub win: Option<Marks>,
}

impl Status {
    pub fn is_over(&self) -> bool {
        self.draw || self.win.is_some()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.win {
            Some(mark) => write!(f, "{} wins", mark),
            None if self.draw => write!(f, "draw"),
            None => write!(f, "in play"),
        }
    }
}

/// Board state plus the rules that read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Game {
    board: Board,
}

impl Game {
    pub fn new() -> Self {
        Game {
            board: Board::new(),
        }
    }

    pub fn with_board(board: Board) -> Self {
        Game { board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Plays `mark` at (`row`, `col`) and returns the resulting status.
    ///
    /// Turn order is not checked here; that belongs to whoever drives the game.
    /// On error the board is left untouched.
    pub fn make_move(&mut self, row: usize, col: usize, mark: Marks) -> Result<Status> {
        if mark.is_empty() {
            return Err(Error::InvalidMark);
        }
        let cell = self
            .board
            .cells
            .get_mut((row, col))
            .ok_or(Error::OutOfBounds { row, col })?;
        if !cell.is_empty() {
            return Err(Error::OccupiedCell { row, col });
        }
        *cell = mark;
        debug!(row, col, %mark, "square played");
        Ok(self.status())
    }

    pub fn status(&self) -> Status {
        let win = self.win();
        Status {
            draw: win.is_none() && self.board.is_full(),
            win,
        }
    }

    pub fn check_win(&self, mark: Marks) -> bool {
        self.board.has_line(mark)
    }

    /// The winning side. X is checked before O, which only matters for
    /// boards carrying a line for both.
    pub fn win(&self) -> Option<Marks> {
        [Marks::Cross, Marks::Nought]
            .into_iter()
            .find(|&mark| self.check_win(mark))
    }

    pub fn draw(&self) -> bool {
        self.status().draw
    }

    pub fn is_over(&self) -> bool {
        self.status().is_over()
    }

    pub fn is_full(&self) -> bool {
        self.board.is_full()
    }

    pub fn can_move(&self) -> bool {
        !self.board.is_full()
    }

    pub fn available_moves(&self) -> Vec<(usize, usize)> {
        self.board.empty_cells()
    }

    /// Picks one empty square according to `policy`, or `None` on a full board.
    pub fn select_empty_cell<R: Rng + ?Sized>(
        &self,
        policy: SelectionPolicy,
        rng: &mut R,
    ) -> Option<(usize, usize)> {
        let selected = match policy {
            SelectionPolicy::FirstEmpty => self
                .board
                .indexed_iter()
                .find(|(_index, value)| value.is_empty())
                .map(|(index, _)| index),
            SelectionPolicy::RandomEmpty => self.available_moves().choose(rng).copied(),
        };
        trace!(?policy, ?selected, "selected empty square");
        selected
    }

    pub fn random_playable_square<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(usize, usize)> {
        self.select_empty_cell(SelectionPolicy::RandomEmpty, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use super::Marks::{Cross as X, Empty as E, Nought as O};

    const LINES: [[(usize, usize); 3]; 8] = [
        [(0, 0), (0, 1), (0, 2)],
        [(1, 0), (1, 1), (1, 2)],
        [(2, 0), (2, 1), (2, 2)],
        [(0, 0), (1, 0), (2, 0)],
        [(0, 1), (1, 1), (2, 1)],
        [(0, 2), (1, 2), (2, 2)],
        [(0, 0), (1, 1), (2, 2)],
        [(0, 2), (1, 1), (2, 0)],
    ];

    #[test]
    fn fresh_game_is_empty_and_in_play() {
        let game = Game::new();
        assert_eq!(game.board().len(), 9);
        assert!(game.board().iter().all(|m| m.is_empty()));
        assert_eq!(game.status(), Status { draw: false, win: None });
        assert!(!game.is_over());
        assert!(game.can_move());
    }

    #[test]
    fn moves_land_on_row_and_column() {
        let mut game = Game::new();
        game.make_move(0, 0, X).unwrap();
        game.make_move(2, 2, O).unwrap();
        game.make_move(0, 2, X).unwrap();
        assert_eq!(
            *game.board(),
            Board::from_rows([[X, E, X], [E, E, E], [E, E, O]])
        );
    }

    #[test]
    fn occupied_square_is_rejected_without_mutation() {
        let mut game = Game::new();
        game.make_move(1, 1, X).unwrap();
        let before = game.board().clone();
        let err = game.make_move(1, 1, O).unwrap_err();
        assert!(matches!(err, Error::OccupiedCell { row: 1, col: 1 }));
        assert_eq!(*game.board(), before);
    }

    #[test]
    fn off_board_and_empty_mark_are_rejected() {
        let mut game = Game::new();
        assert!(matches!(
            game.make_move(3, 0, X),
            Err(Error::OutOfBounds { row: 3, col: 0 })
        ));
        assert!(matches!(game.make_move(0, 0, E), Err(Error::InvalidMark)));
        assert_eq!(*game.board(), Board::new());
    }

    #[test]
    fn every_line_wins() {
        for mark in [X, O] {
            for line in LINES {
                let mut game = Game::new();
                for (row, col) in line {
                    game.make_move(row, col, mark).unwrap();
                }
                assert_eq!(game.win(), Some(mark), "line {:?}", line);
                assert!(!game.draw());
                assert!(game.is_over());
            }
        }
    }

    fn replay(moves: &[(usize, usize)]) -> Vec<bool> {
        let mut game = Game::new();
        let mut mark = X;
        moves
            .iter()
            .map(|&(row, col)| {
                let status = game.make_move(row, col, mark).unwrap();
                mark = mark.other();
                assert_eq!(status, game.status());
                game.is_over()
            })
            .collect()
    }

    #[test]
    fn over_flips_on_the_completing_move() {
        let moves = [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)];
        assert_eq!(replay(&moves), [false, false, false, false, true]);
    }

    #[test]
    fn over_flips_when_the_ninth_square_fills() {
        // X O X / X O O / O X X
        let moves = [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (2, 0),
            (2, 1),
            (1, 2),
            (2, 2),
        ];
        let over = replay(&moves);
        assert!(over[..8].iter().all(|&over| !over));
        assert!(over[8]);
    }

    #[test]
    fn status_is_stable_between_moves() {
        let mut game = Game::new();
        game.make_move(0, 1, X).unwrap();
        assert_eq!(game.status(), game.status());
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let game = Game::with_board(Board::from_rows([[X, O, X], [O, X, O], [O, X, O]]));
        assert_eq!(game.status(), Status { draw: true, win: None });
        assert!(game.is_over());
        assert!(!game.can_move());
    }

    #[test]
    fn diagonal_win_for_x() {
        let game = Game::with_board(Board::from_rows([[X, O, X], [E, X, O], [X, E, O]]));
        assert!(game.is_over());
        assert_eq!(game.status().win, Some(X));
    }

    #[test]
    fn column_win_for_o() {
        let game = Game::with_board(Board::from_rows([[O, X, E], [O, X, X], [O, O, X]]));
        assert!(game.is_over());
        assert_eq!(game.win(), Some(O));
    }

    #[test]
    fn full_board_with_line_reports_win_not_draw() {
        let game = Game::with_board(Board::from_rows([[X, X, X], [O, O, X], [X, O, O]]));
        assert_eq!(game.status(), Status { draw: false, win: Some(X) });
    }

    #[test]
    fn double_win_reports_x() {
        let game = Game::with_board(Board::from_rows([[X, X, X], [O, O, O], [E, E, E]]));
        assert_eq!(game.win(), Some(X));
    }

    #[test]
    fn first_empty_scans_row_major() {
        let game = Game::with_board(Board::from_rows([[X, O, X], [O, E, E], [E, E, E]]));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            game.select_empty_cell(SelectionPolicy::FirstEmpty, &mut rng),
            Some((1, 1))
        );
    }

    #[test]
    fn random_selection_only_returns_empty_squares() {
        let game = Game::with_board(Board::from_rows([[X, O, X], [O, E, X], [E, O, O]]));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let square = game.random_playable_square(&mut rng).unwrap();
            assert!([(1, 1), (2, 0)].contains(&square));
        }
    }

    #[test]
    fn nothing_to_select_on_full_board() {
        let game = Game::with_board(Board::from_rows([[X, O, X], [O, X, O], [O, X, O]]));
        let mut rng = StdRng::seed_from_u64(1);
        for policy in [SelectionPolicy::FirstEmpty, SelectionPolicy::RandomEmpty] {
            assert_eq!(game.select_empty_cell(policy, &mut rng), None);
        }
    }

    #[test]
    fn board_renders_three_rows() {
        let board = Board::from_rows([[X, E, E], [E, O, E], [E, E, X]]);
        assert_eq!(board.to_string(), "X - -\n- O -\n- - X\n");
    }

    #[test]
    fn marks_flip_and_render() {
        assert_eq!(X.other(), O);
        assert_eq!(O.other(), X);
        assert_eq!(E.other(), E);
        assert_eq!(X.as_char(), 'X');
        assert_eq!(O.as_char(), 'O');
    }
}
