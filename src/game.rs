//! The stateful game: board, score, status and the RNG that feeds tile
//! placement. All board arithmetic lives in [`crate::engine`]; this module
//! only sequences it.

use crate::engine::{Board, Move, Score, Shifted};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use tracing::{debug, info, trace};

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Not started yet, or in the middle of a restart.
    #[default]
    Idle,
    /// Accepting moves.
    Playing,
    /// A 2048 tile is on the board.
    Win,
    /// Board is full and nothing can merge.
    Lose,
}

impl Status {
    pub fn is_terminal(self) -> bool { matches!(self, Status::Win | Status::Lose) }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Idle => "idle",
            Status::Playing => "playing",
            Status::Win => "win",
            Status::Lose => "lose",
        };
        f.write_str(name)
    }
}

/// A single game of 2048.
///
/// The random source is injected so tests and replays can seed it:
/// ```
/// use play_2048::game::{Game, Status};
/// let mut game = Game::from_seed(42);
/// game.start();
/// assert_eq!(game.status(), Status::Playing);
/// assert_eq!(game.state().count_empty(), 14);
/// let _changed = game.move_left();
/// ```
#[derive(Debug, Clone)]
pub struct Game<R = StdRng> {
    board: Board,
    initial: Board,
    score: Score,
    status: Status,
    started: bool,
    rng: R,
}

impl Game<StdRng> {
    /// Empty board, deterministic tile placement.
    pub fn from_seed(seed: u64) -> Self { Game::new(StdRng::seed_from_u64(seed)) }

    /// Empty board seeded from OS entropy.
    pub fn from_entropy() -> Self { Game::new(StdRng::from_entropy()) }
}

impl<R: Rng> Game<R> {
    /// Start from an empty board.
    pub fn new(rng: R) -> Self { Game::with_board(Board::EMPTY, rng) }

    /// Start from `board`, which is also what `restart` returns to.
    pub fn with_board(board: Board, rng: R) -> Self {
        Game { board, initial: board, score: 0, status: Status::Idle, started: false, rng }
    }

    /// Drop two random tiles and begin accepting moves.
    pub fn start(&mut self) {
        self.generate_new_tile();
        self.generate_new_tile();
        self.status = Status::Playing;
        self.started = true;
        info!(empty = self.board.count_empty(), "game started");
    }

    /// Return to the initial board with a zero score, then `start` again.
    pub fn restart(&mut self) {
        info!(score = self.score, "restarting game");
        self.board = self.initial;
        self.score = 0;
        self.status = Status::Idle;
        self.start();
    }

    pub fn move_left(&mut self) -> bool { self.make_move(Move::Left) }

    pub fn move_right(&mut self) -> bool { self.make_move(Move::Right) }

    pub fn move_up(&mut self) -> bool { self.make_move(Move::Up) }

    pub fn move_down(&mut self) -> bool { self.make_move(Move::Down) }

    /// Slide the board in `direction`.
    ///
    /// Returns `true` if the board changed, in which case a new tile was
    /// placed and the win/lose status re-evaluated. Outside `Playing` this
    /// does nothing and returns `false`.
    pub fn make_move(&mut self, direction: Move) -> bool {
        if self.status != Status::Playing {
            trace!(%direction, status = %self.status, "move ignored");
            return false;
        }

        let before = self.board;
        let Shifted { board, score } = before.shift(direction);
        self.score += score;
        self.board = board;

        if board == before {
            trace!(%direction, "move left the board unchanged");
            return false;
        }

        let spawn = self.board.spawn_tile(&mut self.rng);
        debug!(%direction, gained = score, total = self.score, ?spawn, "move applied");
        self.check_game_status();
        true
    }

    /// Place a 2 or 4 on a random empty cell. `false` when the board is full.
    pub fn generate_new_tile(&mut self) -> bool { self.board.spawn_tile(&mut self.rng).is_some() }

    /// Mark the game won if a 2048 is present, or lost if nothing can move.
    pub fn check_game_status(&mut self) {
        if self.board.contains_winning_tile() {
            self.enter(Status::Win);
            return;
        }
        if self.board.has_mergeable_pair() {
            return;
        }
        if !self.board.has_available_moves() {
            self.enter(Status::Lose);
        }
    }

    fn enter(&mut self, status: Status) {
        if self.status != status {
            info!(%status, score = self.score, highest = self.board.highest_tile(), "game over");
        }
        self.status = status;
    }
}

impl<R> Game<R> {
    pub fn score(&self) -> Score { self.score }

    /// Snapshot of the current board. Mutating it does not affect the game.
    pub fn state(&self) -> Board { self.board }

    pub fn status(&self) -> Status { self.status }

    /// True once `start` has been called at least once.
    pub fn is_started(&self) -> bool { self.started }

    /// The board captured at construction, restored by `restart`.
    pub fn initial_board(&self) -> Board { self.initial }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, board: Board, status: Status) {
        self.board = board;
        self.status = status;
    }
}
