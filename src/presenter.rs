//! Presentation seam
//!
//! The game core never draws anything or reads raw input. It talks to the
//! window, terminal or test harness that hosts it through [`Presenter`], and
//! reads time through [`Clock`] so the driver loop can run against a manual
//! clock.

use std::time::Duration;

use web_time::Instant;

use crate::{
    game::{Event, Snapshot},
    leaderboard::ScoreEntry,
    names,
    question::Question,
};

/// Trait for the layer that shows the game and collects player input
///
/// Implementations translate mouse clicks and key presses into [`Event`]s
/// (answer buttons, start, stop, closing the window) before handing them
/// over; the core never sees coordinates or key codes.
pub trait Presenter {
    /// Draws the board, counters and, while the race runs, the current question
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Read-only view of the session for this tick
    /// * `question` - The question to display, `None` outside the running phase
    fn render(&mut self, snapshot: &Snapshot, question: Option<&Question>);

    /// Returns the input events queued since the last call, in arrival order
    fn poll_events(&mut self) -> Vec<Event>;

    /// Asks the player for the name to record with their score
    ///
    /// Returns `None` if the player closed the prompt without confirming.
    fn capture_name(&mut self) -> Option<String>;

    /// Tells the player why the name they entered was not accepted
    fn name_rejected(&mut self, error: names::Error);

    /// Shows the high score table, best first
    fn show_scores(&mut self, entries: &[ScoreEntry]);

    /// Tears down the presentation
    fn close(self);
}

/// Source of time for the driver loop
pub trait Clock {
    /// The current instant
    fn now(&self) -> Instant;

    /// Blocks until `duration` has passed
    fn wait(&mut self, duration: Duration);
}

/// Wall clock that sleeps the current thread between ticks
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
