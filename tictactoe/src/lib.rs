//! Tic-tac-toe engine: a 3x3 board with win/draw detection, two kinds of
//! player, and a match that referees a human against the computer.
//!
//! ```
//! use tictactoe::{HumanVsComputerMatch, Marks, Turn};
//!
//! let mut game_match = HumanVsComputerMatch::new(Marks::Cross, Marks::Nought)?;
//! assert_eq!(game_match.turn(), Turn::Human);
//! game_match.human_move(1, 1)?;
//! game_match.computer_move()?;
//! assert!(!game_match.is_over());
//! # Ok::<(), tictactoe::Error>(())
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::info;

pub mod board;
pub mod config;
pub mod error;
pub mod players;

pub use board::{Board, Game, Marks, Status};
pub use config::MatchConfig;
pub use error::{Error, Result};
pub use players::{Computer, Human, Player, Seat, SelectionPolicy};

/// Whose move it is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Turn {
    Human,
    Computer,
}

impl Turn {
    pub fn next(self) -> Self {
        match self {
            Turn::Human => Turn::Computer,
            Turn::Computer => Turn::Human,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Turn::Human => write!(f, "human"),
            Turn::Computer => write!(f, "computer"),
        }
    }
}

/// One playthrough between a human and the computer.
///
/// The match owns the game; both players hold weak handles to it. X always
/// opens, so a computer playing X moves once before `from_config` returns.
/// Moves keep being accepted after the game is over as long as squares
/// remain, so callers should check [`is_over`](Self::is_over) first.
#[derive(Debug)]
pub struct HumanVsComputerMatch {
    game: Rc<RefCell<Game>>,
    human: Human,
    computer: Computer,
    turn: Turn,
}

impl HumanVsComputerMatch {
    pub fn new(human: Marks, computer: Marks) -> Result<Self> {
        Self::from_config(&MatchConfig::new(human, computer))
    }

    pub fn from_config(config: &MatchConfig) -> Result<Self> {
        let game = Rc::new(RefCell::new(Game::new()));
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let human = Human::new(Rc::downgrade(&game), config.human)?;
        let computer =
            Computer::with_rng(Rc::downgrade(&game), config.computer, config.policy, rng)?;
        let turn = if config.human == Marks::Cross {
            Turn::Human
        } else {
            Turn::Computer
        };
        info!(human = %config.human, computer = %config.computer, %turn, "match started");

        let mut game_match = HumanVsComputerMatch {
            game,
            human,
            computer,
            turn,
        };
        if config.computer == Marks::Cross {
            game_match.computer_move()?;
        }
        Ok(game_match)
    }

    pub fn human_move(&mut self, row: usize, col: usize) -> Result<Status> {
        self.ensure_turn(Turn::Human)?;
        let status = self.human.play((row, col))?;
        self.next(status);
        Ok(status)
    }

    pub fn computer_move(&mut self) -> Result<Status> {
        self.ensure_turn(Turn::Computer)?;
        let status = self.computer.play(())?;
        self.next(status);
        Ok(status)
    }

    fn ensure_turn(&self, expected: Turn) -> Result<()> {
        if self.turn != expected {
            return Err(Error::WrongTurn(self.turn));
        }
        Ok(())
    }

    fn next(&mut self, status: Status) {
        self.turn = self.turn.next();
        if status.is_over() {
            info!(%status, "match over");
        }
    }

    pub fn status(&self) -> Status {
        self.game.borrow().status()
    }

    pub fn is_over(&self) -> bool {
        self.game.borrow().is_over()
    }

    pub fn can_move(&self) -> bool {
        self.game.borrow().can_move()
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Mark of the player whose turn it is.
    pub fn turn_mark(&self) -> Marks {
        match self.turn {
            Turn::Human => self.human.mark(),
            Turn::Computer => self.computer.mark(),
        }
    }

    /// Read-only view of the human player. Moving goes through
    /// [`human_move`](Self::human_move), which checks the turn:
    ///
    /// ```compile_fail
    /// use tictactoe::{HumanVsComputerMatch, Marks, Player};
    ///
    /// let game_match = HumanVsComputerMatch::new(Marks::Cross, Marks::Nought).unwrap();
    /// let mut human = game_match.human().clone();
    /// human.play((0, 0)).unwrap();
    /// ```
    pub fn human(&self) -> &Human {
        &self.human
    }

    /// Read-only view of the computer player. Its game handle is not exposed:
    ///
    /// ```compile_fail
    /// use tictactoe::{HumanVsComputerMatch, Marks};
    ///
    /// let game_match = HumanVsComputerMatch::new(Marks::Cross, Marks::Nought).unwrap();
    /// game_match.computer().seat();
    /// ```
    pub fn computer(&self) -> &Computer {
        &self.computer
    }

    /// Borrows the game for inspection. The borrow has to end before the
    /// next move:
    ///
    /// ```compile_fail
    /// use tictactoe::{HumanVsComputerMatch, Marks};
    ///
    /// let mut game_match = HumanVsComputerMatch::new(Marks::Cross, Marks::Nought).unwrap();
    /// let game = game_match.game();
    /// game_match.human_move(0, 0).unwrap();
    /// drop(game);
    /// ```
    pub fn game(&self) -> Ref<'_, Game> {
        self.game.borrow()
    }
}
