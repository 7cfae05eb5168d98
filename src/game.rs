//! Core game logic and state management
//!
//! This module contains the race session and the rules that move it from
//! the idle board, through the timed questions, to the end of the race.
//! [`Game`] holds the immutable configuration (board, questions, rules) and
//! advances a [`Session`] value one tick at a time; [`Game::run`] drives that
//! loop against a [`Presenter`], a [`ScoreStore`] and a [`Clock`].

use std::fmt::Debug;

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::Instant;

use crate::{
    board::Board,
    config::Rules,
    leaderboard::{self, ScoreEntry, ScoreStore},
    names,
    presenter::{Clock, Presenter},
    question::{Label, Question, QuestionBank},
};

/// Coarse lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Board shown, countdown frozen, waiting for the start command
    Idle,
    /// Countdown active, questions presented, answers accepted
    Running,
    /// The race is over
    Ended,
}

/// Discrete input understood by the session
///
/// The presentation layer decodes clicks and key presses into these events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Start the race
    Start,
    /// End the race early, keeping the score
    Stop,
    /// Leave the game without recording anything
    Quit,
    /// Pick one of the choices of the current question
    Answer(Label),
}

impl From<Label> for Event {
    fn from(label: Label) -> Self {
        Self::Answer(label)
    }
}

/// Why a race ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The token reached the finish
    ReachedFinish,
    /// The player stopped the race
    Stopped,
}

/// Terminal result of a tick, reported once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The race ended and its score should be recorded
    Ended {
        /// What ended the race
        reason: EndReason,
        /// Final score
        score: u32,
        /// Squares advanced when the race ended
        square: usize,
    },
    /// The player left the game; nothing is recorded
    Quit,
}

/// Read-only view of a session handed to the presentation layer each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Current phase
    pub phase: Phase,
    /// Squares advanced so far
    pub square: usize,
    /// Drawn square the token stands on
    pub token_square: usize,
    /// Points scored so far
    pub score: u32,
    /// Index of the question being asked
    pub question_index: usize,
    /// Whole seconds left to answer
    pub time_remaining: u64,
}

/// State of one race
///
/// A session is created when the program starts and is discarded when the
/// race ends; there is no way to reset it. It only changes through the
/// transition methods below, which [`Game::advance`] calls in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Squares advanced; floored at zero, not capped by the board length
    square: usize,
    score: u32,
    question_index: usize,
    /// Countdown shown to the player, in whole seconds
    time_remaining: u64,
    question_started: Instant,
    last_action: Instant,
    phase: Phase,
}

impl Session {
    /// Creates an idle session with the countdown at its initial value
    pub fn new(rules: &Rules, now: Instant) -> Self {
        Self {
            square: 0,
            score: 0,
            question_index: 0,
            time_remaining: rules.question_time_limit.as_secs(),
            question_started: now,
            last_action: now,
            phase: Phase::Idle,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Squares advanced so far
    pub fn square(&self) -> usize {
        self.square
    }

    /// Points scored so far
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Index of the question being asked
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Whole seconds left to answer the current question
    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    /// Builds the view shown to the player
    pub fn snapshot(&self, board: &Board) -> Snapshot {
        Snapshot {
            phase: self.phase,
            square: self.square,
            token_square: board.token_square(self.square),
            score: self.score,
            question_index: self.question_index,
            time_remaining: self.time_remaining,
        }
    }

    /// Moves from `before` to `after` if the session is currently in `before`
    fn change_phase(&mut self, before: Phase, after: Phase) -> bool {
        if self.phase == before {
            self.phase = after;

            true
        } else {
            false
        }
    }

    /// Restarts both the question countdown and the idle timer
    fn reset_timers(&mut self, now: Instant) {
        self.question_started = now;
        self.last_action = now;
    }

    /// Starts the race
    ///
    /// # Returns
    ///
    /// `true` if the session was idle and is now running
    pub fn start(&mut self, now: Instant) -> bool {
        if self.change_phase(Phase::Idle, Phase::Running) {
            self.reset_timers(now);
            log::info!("race started");
            true
        } else {
            false
        }
    }

    /// Applies an answer to the current question
    ///
    /// A correct answer scores points and moves the token forward, then the
    /// special square it lands on (if any) moves it once more. A wrong answer
    /// moves it back. Either way the next question comes up with fresh timers.
    ///
    /// # Returns
    ///
    /// `Some` if the answer carried the token to the finish
    pub fn answer(&mut self, game: &Game, label: Label, now: Instant) -> Option<Outcome> {
        if self.phase != Phase::Running {
            return None;
        }
        let question = game.questions.get(self.question_index)?;
        let rules = &game.rules;

        if question.is_correct(label) {
            self.score = self.score.saturating_add(rules.points_per_correct);
            self.square = self.square.saturating_add(rules.steps_per_correct);

            if let Some(effect) = game.board.effect_at(self.square) {
                let landed = self.square;
                self.square = effect.apply(landed);
                log::debug!("special square {landed} ({effect}) moved token to {}", self.square);
            }

            log::debug!(
                "question {} answered correctly, token at {}, score {}",
                self.question_index,
                self.square,
                self.score
            );
        } else {
            self.square = self.square.saturating_sub(rules.steps_per_wrong);

            log::debug!(
                "question {} answered wrongly with {label}, token at {}",
                self.question_index,
                self.square
            );
        }

        self.next_question(game, now);
        self.check_finish(&game.board)
    }

    /// Ends the race at the player's request
    ///
    /// # Returns
    ///
    /// `Some` if the race was running
    pub fn stop(&mut self) -> Option<Outcome> {
        if self.phase == Phase::Running {
            Some(self.end(EndReason::Stopped))
        } else {
            None
        }
    }

    /// Updates the countdown and skips the question once the player has been
    /// idle for too long
    ///
    /// The skip only advances to the next question; it costs squares only if
    /// [`Rules::penalize_timeout`] is set.
    ///
    /// # Returns
    ///
    /// `Some` if the token is at or past the finish
    pub fn tick(&mut self, game: &Game, now: Instant) -> Option<Outcome> {
        if self.phase != Phase::Running {
            return None;
        }
        let rules = &game.rules;

        let idle = now.saturating_duration_since(self.last_action);
        if idle.as_secs() >= rules.idle_timeout.as_secs() {
            if rules.penalize_timeout {
                self.square = self.square.saturating_sub(rules.steps_per_wrong);
            }
            log::debug!(
                "question {} timed out after {}s",
                self.question_index,
                idle.as_secs()
            );
            self.next_question(game, now);
        }

        self.time_remaining = Rules::seconds_left(
            rules.question_time_limit,
            now.saturating_duration_since(self.question_started),
        );

        self.check_finish(&game.board)
    }

    /// Applies a single event
    fn apply(&mut self, game: &Game, event: Event, now: Instant) -> Option<Outcome> {
        match event {
            Event::Start => {
                self.start(now);
                None
            }
            Event::Stop => self.stop(),
            Event::Quit if self.phase != Phase::Ended => Some(Outcome::Quit),
            Event::Quit => None,
            Event::Answer(label) => self.answer(game, label, now),
        }
    }

    fn next_question(&mut self, game: &Game, now: Instant) {
        self.question_index = game.questions.next_index(self.question_index);
        self.reset_timers(now);
        self.time_remaining = game.rules.question_time_limit.as_secs();
    }

    fn check_finish(&mut self, board: &Board) -> Option<Outcome> {
        if self.phase == Phase::Running && board.is_finish(self.square) {
            Some(self.end(EndReason::ReachedFinish))
        } else {
            None
        }
    }

    fn end(&mut self, reason: EndReason) -> Outcome {
        self.phase = Phase::Ended;
        log::info!(
            "race ended ({reason:?}) with score {} at square {}",
            self.score,
            self.square
        );
        Outcome::Ended {
            reason,
            score: self.score,
            square: self.square,
        }
    }
}

/// Errors in a game configuration
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration could not be parsed
    #[error("cannot parse game configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The configuration breaks a board, question or rule constraint
    #[error("invalid game configuration: {0}")]
    Invalid(#[from] garde::Report),
}

/// How a call to [`Game::run`] finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The race ended and its score was recorded
    Finished {
        /// What ended the race
        reason: EndReason,
        /// The entry that was recorded
        entry: ScoreEntry,
    },
    /// The player quit; nothing was recorded
    Quit,
}

/// Immutable configuration of the race
///
/// Every field is validated on construction, so a `Game` always has at
/// least one question and one square.
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Game {
    /// Squares, finish and special squares
    #[garde(dive)]
    board: Board,
    /// Questions asked in order
    #[garde(dive)]
    questions: QuestionBank,
    /// Timing and scoring parameters
    #[garde(dive)]
    rules: Rules,
}

impl Debug for Game {
    /// Custom debug implementation that avoids printing the whole question bank
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("board", &self.board)
            .field("questions", &self.questions.len())
            .field("rules", &self.rules)
            .finish()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::standard()
    }
}

impl Game {
    /// Creates a game from its parts after validating them
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` if any part breaks its constraints.
    pub fn new(board: Board, questions: QuestionBank, rules: Rules) -> Result<Self, Error> {
        let game = Self {
            board,
            questions,
            rules,
        };
        game.validate()?;
        Ok(game)
    }

    /// The classic game: standard board, built-in questions, default rules
    pub fn standard() -> Self {
        Self {
            board: Board::standard(),
            questions: QuestionBank::standard(),
            rules: Rules::default(),
        }
    }

    /// Parses a game configuration from JSON
    ///
    /// Any of `board`, `questions` and `rules` may be omitted, in which case
    /// the classic value is used.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` for malformed JSON and `Error::Invalid` if the
    /// configuration breaks its constraints.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let game: Self = serde_json::from_str(json)?;
        game.validate()?;
        Ok(game)
    }

    /// The board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The question bank
    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    /// The rules
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Creates the idle session a race starts from
    pub fn new_session(&self, now: Instant) -> Session {
        Session::new(&self.rules, now)
    }

    /// The question to show for `session`, only while the race is running
    pub fn current_question(&self, session: &Session) -> Option<&Question> {
        match session.phase {
            Phase::Running => self.questions.get(session.question_index),
            Phase::Idle | Phase::Ended => None,
        }
    }

    /// Advances a session by one tick
    ///
    /// Events are applied in arrival order at `now`; once one of them ends
    /// the race or quits, the rest are dropped. The countdown and idle
    /// timeout are then updated for `now`.
    ///
    /// # Returns
    ///
    /// The updated session, and the terminal outcome if this tick produced
    /// one. An ended session never produces another outcome.
    pub fn advance<I>(&self, mut session: Session, now: Instant, events: I) -> (Session, Option<Outcome>)
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            if let Some(outcome) = session.apply(self, event, now) {
                return (session, Some(outcome));
            }
        }

        let outcome = session.tick(self, now);
        (session, outcome)
    }

    /// Plays one race from the idle board to its end
    ///
    /// Each tick renders the session, drains the presenter's events and
    /// advances the session, then waits for [`Rules::tick_interval`]. When
    /// the race ends the player's name is captured, the score is recorded in
    /// `store` and the table is shown. Quitting closes the presenter without
    /// touching the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the score could not be written. The presenter is
    /// closed in that case too.
    pub fn run<P, S, C>(
        &self,
        mut presenter: P,
        store: &mut S,
        clock: &mut C,
    ) -> Result<RunOutcome, leaderboard::Error>
    where
        P: Presenter,
        S: ScoreStore,
        C: Clock,
    {
        let mut session = self.new_session(clock.now());
        log::info!(
            "race ready: {} questions, {} squares, finish at {}",
            self.questions.len(),
            self.board.len(),
            self.board.finish_index()
        );

        loop {
            presenter.render(
                &session.snapshot(&self.board),
                self.current_question(&session),
            );

            let now = clock.now();
            let events = presenter.poll_events();
            let (next, outcome) = self.advance(session, now, events);
            session = next;

            match outcome {
                None => clock.wait(self.rules.tick_interval),
                Some(Outcome::Quit) => {
                    log::info!("player quit before the race ended");
                    presenter.close();
                    return Ok(RunOutcome::Quit);
                }
                Some(Outcome::Ended { reason, score, .. }) => {
                    presenter.render(&session.snapshot(&self.board), None);

                    let name = self.capture_player_name(&mut presenter);
                    let entry = ScoreEntry::new(name, score);

                    let entries = match store.record(entry.clone()) {
                        Ok(entries) => entries,
                        Err(e) => {
                            log::error!("cannot record score: {e}");
                            presenter.close();
                            return Err(e);
                        }
                    };

                    presenter.show_scores(&entries);
                    presenter.close();
                    return Ok(RunOutcome::Finished { reason, entry });
                }
            }
        }
    }

    /// Asks for the player's name until an acceptable one is entered
    ///
    /// A prompt closed without a name records a generated one.
    fn capture_player_name<P: Presenter>(&self, presenter: &mut P) -> String {
        loop {
            let Some(raw) = presenter.capture_name() else {
                return self.rules.name_style.get_name();
            };

            match names::resolve(&raw, self.rules.name_style) {
                Ok(name) => return name,
                Err(e) => {
                    log::debug!("rejected player name: {e}");
                    presenter.name_rejected(e);
                }
            }
        }
    }
}
