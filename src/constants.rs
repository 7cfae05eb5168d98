//! Configuration constants for the Carrera game
//!
//! This module contains the default rules of the race and the limits
//! used to validate boards, question banks and player names.

/// Timing defaults and bounds
pub mod timing {
    /// Seconds the player has to answer a question
    pub const QUESTION_TIME_LIMIT: u64 = 5;
    /// Seconds without any action after which the question is forfeited
    pub const IDLE_TIMEOUT: u64 = 5;
    /// Minimum configurable time limit in seconds
    pub const MIN_TIME_LIMIT: u64 = 1;
    /// Maximum configurable time limit in seconds
    pub const MAX_TIME_LIMIT: u64 = 240;
    /// Milliseconds between two iterations of the driver loop
    pub const TICK_INTERVAL_MILLIS: u64 = 16;
    /// Maximum configurable tick interval in milliseconds
    pub const MAX_TICK_INTERVAL_MILLIS: u64 = 1000;
}

/// Scoring and movement defaults
pub mod scoring {
    /// Points awarded for a correct answer
    pub const POINTS_PER_CORRECT: u32 = 10;
    /// Squares advanced on a correct answer
    pub const STEPS_PER_CORRECT: usize = 2;
    /// Squares lost on a wrong answer
    pub const STEPS_PER_WRONG: usize = 1;
}

/// Board limits
pub mod board {
    /// Maximum number of squares on a board
    pub const MAX_SQUARE_COUNT: usize = 256;
}

/// Question bank limits
pub mod question {
    /// Maximum number of questions in a bank
    pub const MAX_QUESTION_COUNT: usize = 1000;
    /// Maximum length of a question prompt
    pub const MAX_PROMPT_LENGTH: usize = 300;
    /// Maximum length of a single answer choice
    pub const MAX_CHOICE_LENGTH: usize = 100;
}

/// High score table configuration
pub mod leaderboard {
    /// Number of entries kept in the score table
    pub const MAX_ENTRIES: usize = 10;
    /// File used by [`crate::leaderboard::FileStore::default`]
    pub const DEFAULT_FILE: &str = "scores.json";
}

/// Player name configuration
pub mod names {
    /// Maximum length of a player name in bytes
    pub const MAX_LENGTH: usize = 30;
}
