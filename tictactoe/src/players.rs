use crate::board::{Game, Marks, Status};
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

/// How the computer picks its square.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// First empty square scanning rows top to bottom, columns left to right.
    FirstEmpty,
    /// Uniformly random empty square.
    #[default]
    RandomEmpty,
}

/// A side seated at a game: a non-owning handle to the game plus its mark.
///
/// The handle stays inside the crate, so the only write path is the owning
/// player's `play`.
#[derive(Debug)]
pub struct Seat {
    game: Weak<RefCell<Game>>,
    mark: Marks,
}

impl Seat {
    pub fn new(game: Weak<RefCell<Game>>, mark: Marks) -> Result<Self> {
        if game.strong_count() == 0 || mark.is_empty() {
            return Err(Error::InvalidConstruction);
        }
        Ok(Seat { game, mark })
    }

    pub fn mark(&self) -> Marks {
        self.mark
    }

    pub(crate) fn game(&self) -> Result<Rc<RefCell<Game>>> {
        self.game.upgrade().ok_or(Error::GameUnavailable)
    }

    fn play_at(&self, row: usize, col: usize) -> Result<Status> {
        let handle = self.game()?;
        let mut game = handle.try_borrow_mut().map_err(|_| Error::GameBusy)?;
        game.make_move(row, col, self.mark)
    }
}

/// One side of a match. Each variant decides for itself what it needs to
/// make a move.
pub trait Player {
    type Input;
    fn mark(&self) -> Marks;
    fn play(&mut self, input: Self::Input) -> Result<Status>;
}

/// Plays wherever the caller says.
#[derive(Debug)]
pub struct Human {
    seat: Seat,
}

impl Human {
    /// Seats a human playing `mark`. Matches seat the human as X unless
    /// [`MatchConfig`](crate::MatchConfig) says otherwise.
    pub fn new(game: Weak<RefCell<Game>>, mark: Marks) -> Result<Self> {
        Ok(Human {
            seat: Seat::new(game, mark)?,
        })
    }
}

impl Player for Human {
    type Input = (usize, usize);

    fn mark(&self) -> Marks {
        self.seat.mark()
    }

    fn play(&mut self, (row, col): (usize, usize)) -> Result<Status> {
        debug!(mark = %self.seat.mark, row, col, "human move");
        self.seat.play_at(row, col)
    }
}

/// Picks its own square with a [`SelectionPolicy`].
#[derive(Debug)]
pub struct Computer {
    seat: Seat,
    policy: SelectionPolicy,
    rng: StdRng,
}

impl Computer {
    /// Seats a computer playing `mark` with an entropy-seeded random source.
    /// Matches seat the computer as O unless [`MatchConfig`](crate::MatchConfig)
    /// says otherwise.
    pub fn new(game: Weak<RefCell<Game>>, mark: Marks, policy: SelectionPolicy) -> Result<Self> {
        Self::with_rng(game, mark, policy, StdRng::from_entropy())
    }

    /// Seats a computer drawing from the given random source, so tests can
    /// pin down which square gets picked.
    pub fn with_rng(
        game: Weak<RefCell<Game>>,
        mark: Marks,
        policy: SelectionPolicy,
        rng: StdRng,
    ) -> Result<Self> {
        Ok(Computer {
            seat: Seat::new(game, mark)?,
            policy,
            rng,
        })
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }
}

impl Player for Computer {
    type Input = ();

    fn mark(&self) -> Marks {
        self.seat.mark()
    }

    fn play(&mut self, _: ()) -> Result<Status> {
        let handle = self.seat.game()?;
        let mut game = handle.try_borrow_mut().map_err(|_| Error::GameBusy)?;
        let (row, col) = game
            .select_empty_cell(self.policy, &mut self.rng)
            .ok_or(Error::NoMoveAvailable)?;
        debug!(mark = %self.seat.mark, row, col, policy = ?self.policy, "computer move");
        game.make_move(row, col, self.seat.mark)
    }
}
