//! # Carrera Game Library
//!
//! This library provides the core logic of a single-player trivia board
//! race. The player answers timed multiple-choice questions; correct answers
//! move a token forward along a board with special squares, wrong answers
//! move it back, and the final score goes into a persistent high score table.
//!
//! Drawing and raw input stay outside the library: a host implements
//! [`presenter::Presenter`] and hands it to [`game::Game::run`], or drives
//! [`game::Game::advance`] from its own loop.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod config;
pub mod constants;
pub mod game;
pub mod leaderboard;
pub mod names;
pub mod presenter;
pub mod question;

pub use game::{Event, Game, Outcome, Phase, RunOutcome, Session, Snapshot};
pub use leaderboard::{FileStore, MemoryStore, ScoreEntry, ScoreStore};
pub use presenter::{Clock, Presenter, SystemClock};
