//! Front-end model: turns typed commands into game calls and renders the
//! board, score and status messaging as text.

use crate::engine::Move;
use crate::game::{Game, Status};
use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  w / k / up / <Up>        move up
  s / j / down / <Down>    move down
  a / h / left / <Left>    move left
  d / l / right / <Right>  move right
  start, restart, n, r     start a new game
  <Enter>                  redraw
  ?, help                  this text
  q, quit                  leave";

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    Start,
    Redraw,
    Help,
    Quit,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown command {0:?}, type ? for help")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Arrow keys arrive as CSI or SS3 sequences when typed into a cooked terminal.
        let cmd = match s.trim().to_ascii_lowercase().as_str() {
            "" => Command::Redraw,
            "w" | "k" | "up" | "\x1b[a" | "\x1boa" => Command::Move(Move::Up),
            "s" | "j" | "down" | "\x1b[b" | "\x1bob" => Command::Move(Move::Down),
            "a" | "h" | "left" | "\x1b[d" | "\x1bod" => Command::Move(Move::Left),
            "d" | "l" | "right" | "\x1b[c" | "\x1boc" => Command::Move(Move::Right),
            "start" | "restart" | "n" | "r" => Command::Start,
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => return Err(UnknownCommand(other.to_string())),
        };
        Ok(cmd)
    }
}

/// What the front end should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Redraw,
    Unchanged,
    Help,
    Quit,
}

pub struct Session<R = StdRng> {
    game: Game<R>,
}

impl<R: Rng> Session<R> {
    pub fn new(game: Game<R>) -> Self { Session { game } }

    pub fn game(&self) -> &Game<R> { &self.game }

    pub fn handle(&mut self, command: Command) -> Outcome {
        match command {
            Command::Start => {
                if self.game.status() == Status::Playing || self.game.is_started() {
                    self.game.restart();
                } else {
                    self.game.start();
                }
                Outcome::Redraw
            }
            Command::Move(direction) => {
                if self.game.status() != Status::Playing {
                    return Outcome::Unchanged;
                }
                if self.game.make_move(direction) { Outcome::Redraw } else { Outcome::Unchanged }
            }
            Command::Redraw => Outcome::Redraw,
            Command::Help => Outcome::Help,
            Command::Quit => Outcome::Quit,
        }
    }

    /// Label for the start control: `Start` until the first game begins.
    pub fn button_label(&self) -> &'static str {
        if self.game.is_started() { "Restart" } else { "Start" }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self.game.status() {
            Status::Idle => Some("Type start to begin."),
            Status::Win => Some("Winner! You reached 2048."),
            Status::Lose => Some("Game over. No moves left."),
            Status::Playing => None,
        }
    }

    pub fn render(&self) -> String { self.to_string() }
}

impl<R: Rng> fmt::Display for Session<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.game.score())?;
        write!(f, "{}", self.game.state())?;
        if let Some(msg) = self.message() {
            writeln!(f, "{msg}")?;
        }
        if self.game.status().is_terminal() {
            writeln!(f, "Type restart to play again.")?;
        }
        writeln!(f, "[{}]", self.button_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;

    fn session(seed: u64) -> Session {
        Session::new(Game::from_seed(seed))
    }

    #[test]
    fn it_parses_commands() {
        assert_eq!("a".parse::<Command>(), Ok(Command::Move(Move::Left)));
        assert_eq!(" UP \n".parse::<Command>(), Ok(Command::Move(Move::Up)));
        assert_eq!("\x1b[B".parse::<Command>(), Ok(Command::Move(Move::Down)));
        assert_eq!("\x1bOC".parse::<Command>(), Ok(Command::Move(Move::Right)));
        assert_eq!("l".parse::<Command>(), Ok(Command::Move(Move::Right)));
        assert_eq!("restart".parse::<Command>(), Ok(Command::Start));
        assert_eq!("".parse::<Command>(), Ok(Command::Redraw));
        assert_eq!("?".parse::<Command>(), Ok(Command::Help));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("jump".parse::<Command>(), Err(UnknownCommand("jump".into())));
    }

    #[test]
    fn start_then_restart() {
        let mut s = session(3);
        assert_eq!(s.button_label(), "Start");
        assert_eq!(s.message(), Some("Type start to begin."));

        assert_eq!(s.handle(Command::Start), Outcome::Redraw);
        assert_eq!(s.game().status(), Status::Playing);
        assert_eq!(s.button_label(), "Restart");
        assert_eq!(s.message(), None);
        assert_eq!(s.game().state().count_empty(), 14);

        // second press restarts from the empty snapshot instead of adding tiles
        assert_eq!(s.handle(Command::Start), Outcome::Redraw);
        assert_eq!(s.game().state().count_empty(), 14);
        assert_eq!(s.game().score(), 0);
    }

    #[test]
    fn moves_before_start_are_ignored() {
        let mut s = session(3);
        for dir in Move::ALL {
            assert_eq!(s.handle(Command::Move(dir)), Outcome::Unchanged);
        }
        assert_eq!(s.game().state(), Board::EMPTY);
    }

    #[test]
    fn effective_move_redraws() {
        let mut s = session(5);
        s.game.set_position(Board::from_rows([[0, 0, 0, 2], [0; 4], [0; 4], [0; 4]]), Status::Playing);
        assert_eq!(s.handle(Command::Move(Move::Right)), Outcome::Unchanged);
        assert_eq!(s.handle(Command::Move(Move::Left)), Outcome::Redraw);
    }

    #[test]
    fn lose_message_and_restart_button() {
        let mut s = session(7);
        s.handle(Command::Start);
        s.game.set_position(
            Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]),
            Status::Lose,
        );
        assert_eq!(s.message(), Some("Game over. No moves left."));
        assert_eq!(s.handle(Command::Move(Move::Up)), Outcome::Unchanged);
        assert_eq!(s.handle(Command::Start), Outcome::Redraw);
        assert_eq!(s.game().status(), Status::Playing);
    }

    #[test]
    fn it_renders_frame() {
        let mut s = session(1);
        s.game.set_position(Board::from_rows([[2048, 0, 0, 0], [0; 4], [0; 4], [0; 4]]), Status::Win);
        let frame = s.render();
        assert!(frame.starts_with("Score: 0\n"));
        assert!(frame.contains(" 2048 |"));
        assert!(frame.contains("Winner!"));
        assert!(frame.contains("Type restart to play again."));
        assert!(frame.ends_with("[Start]\n"));
    }

    #[test]
    fn play_again_prompt_only_after_game_ends() {
        let mut s = session(2);
        s.handle(Command::Start);
        assert!(!s.render().contains("play again"));
        s.game.set_position(
            Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]),
            Status::Lose,
        );
        let frame = s.render();
        assert!(frame.contains("Game over."));
        assert!(frame.contains("Type restart to play again."));
        assert!(frame.ends_with("[Restart]\n"));
    }

    #[test]
    fn passthrough_commands() {
        let mut s = session(1);
        assert_eq!(s.handle(Command::Redraw), Outcome::Redraw);
        assert_eq!(s.handle(Command::Help), Outcome::Help);
        assert_eq!(s.handle(Command::Quit), Outcome::Quit);
    }
}
