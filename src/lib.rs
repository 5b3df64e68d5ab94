//! play-2048: a 2048 board engine with a small terminal front end
//!
//! This crate provides:
//! - A `Board` value type with the pure slide/merge rules (`engine` module)
//! - A stateful `Game` that owns score, status and an injectable RNG (`game` module)
//! - A text front-end model mapping typed commands to moves (`session` module)
//! - TOML session settings overlaid by CLI flags (`config` module)
//!
//! Quick start:
//! ```
//! use play_2048::engine::Move;
//! use play_2048::game::{Game, Status};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game with a seeded RNG
//! let mut game = Game::new(StdRng::seed_from_u64(42));
//! game.start();
//! assert_eq!(game.status(), Status::Playing);
//!
//! // Preview a move without touching the game
//! let before = game.state();
//! let preview = before.shift(Move::Left);
//! let changed = game.move_left();
//! assert_eq!(changed, preview.board != before);
//! assert_eq!(game.score(), preview.score);
//! ```
//!
//! Controlled positions restart to the board they were built with:
//! ```
//! use play_2048::engine::Board;
//! use play_2048::game::Game;
//!
//! let board: Board = "2 2 2 2\n. . . .\n. . . .\n. . . .".parse().unwrap();
//! let mut game = Game::with_board(board, rand::thread_rng());
//! game.start();
//! game.move_left();
//! game.restart();
//! assert_eq!(game.score(), 0);
//! assert_eq!(game.state().count_empty(), 10);
//! ```
pub mod config;
pub mod engine;
pub mod game;
pub mod session;
