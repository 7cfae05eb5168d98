//! Tunable rules of the race
//!
//! [`Rules`] gathers the timing and scoring parameters of a session. The
//! defaults reproduce the classic game: five seconds per question, ten
//! points and two squares for a correct answer, one square back for a
//! wrong one, and no penalty when a question times out.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{scoring, timing},
    names::NameStyle,
};

type ValidationResult = garde::Result;

/// Validates that a duration, in whole seconds, falls within bounds
fn validate_duration<const MIN_SECONDS: u64, const MAX_SECONDS: u64>(
    field: &'static str,
    val: &Duration,
) -> ValidationResult {
    if (MIN_SECONDS..=MAX_SECONDS).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "{field} is outside of the bounds [{MIN_SECONDS},{MAX_SECONDS}]",
        )))
    }
}

fn validate_time_limit(val: &Duration) -> ValidationResult {
    validate_duration::<{ timing::MIN_TIME_LIMIT }, { timing::MAX_TIME_LIMIT }>(
        "question_time_limit",
        val,
    )
}

fn validate_idle_timeout(val: &Duration) -> ValidationResult {
    validate_duration::<{ timing::MIN_TIME_LIMIT }, { timing::MAX_TIME_LIMIT }>(
        "idle_timeout",
        val,
    )
}

fn validate_tick_interval(val: &Duration) -> ValidationResult {
    let millis = val.as_millis();
    if millis == 0 || millis > u128::from(timing::MAX_TICK_INTERVAL_MILLIS) {
        Err(garde::Error::new(format!(
            "tick_interval is outside of the bounds [1,{}] milliseconds",
            timing::MAX_TICK_INTERVAL_MILLIS
        )))
    } else {
        Ok(())
    }
}

/// Timing and scoring parameters of a session
///
/// Missing fields take their default value when deserializing, so a
/// configuration file only needs to list what it changes.
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Rules {
    /// Time the player has to answer before the countdown reaches zero
    #[garde(custom(|v, _| validate_time_limit(v)))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub question_time_limit: Duration,
    /// Time without any action after which the current question is skipped
    #[garde(custom(|v, _| validate_idle_timeout(v)))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub idle_timeout: Duration,
    /// Points awarded for each correct answer
    #[garde(range(min = 1))]
    pub points_per_correct: u32,
    /// Squares advanced for each correct answer
    #[garde(range(min = 1))]
    pub steps_per_correct: usize,
    /// Squares lost for each wrong answer
    #[garde(skip)]
    pub steps_per_wrong: usize,
    /// Whether an idle timeout costs the same squares as a wrong answer
    #[garde(skip)]
    pub penalize_timeout: bool,
    /// Delay between two iterations of the driver loop
    #[garde(custom(|v, _| validate_tick_interval(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub tick_interval: Duration,
    /// Style of the name recorded when the player leaves the name blank
    #[garde(dive)]
    pub name_style: NameStyle,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            question_time_limit: Duration::from_secs(timing::QUESTION_TIME_LIMIT),
            idle_timeout: Duration::from_secs(timing::IDLE_TIMEOUT),
            points_per_correct: scoring::POINTS_PER_CORRECT,
            steps_per_correct: scoring::STEPS_PER_CORRECT,
            steps_per_wrong: scoring::STEPS_PER_WRONG,
            penalize_timeout: false,
            tick_interval: Duration::from_millis(timing::TICK_INTERVAL_MILLIS),
            name_style: NameStyle::default(),
        }
    }
}

impl Rules {
    /// Whole seconds left on a countdown of `limit` after `elapsed`,
    /// floored at zero
    pub(crate) fn seconds_left(limit: Duration, elapsed: Duration) -> u64 {
        limit.as_secs().saturating_sub(elapsed.as_secs())
    }
}
