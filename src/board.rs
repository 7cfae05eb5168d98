//! Board layout and special squares
//!
//! The board is a fixed, linear sequence of squares. Some squares carry an
//! [`Effect`] that moves the token once more when a correct answer lands on
//! them. The finish index marks victory and may lie beyond the last drawn
//! square; the session keeps counting squares past the end of the board.

use std::collections::BTreeMap;

use derive_more::Display;
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::constants::board::MAX_SQUARE_COUNT;

/// An RGB color, serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

#[allow(missing_docs)]
impl Color {
    pub const ORANGE: Self = Self(255, 165, 0);
    pub const GREEN: Self = Self(0, 255, 0);
    pub const YELLOW1: Self = Self(255, 255, 0);
    pub const YELLOW2: Self = Self(238, 238, 0);
    pub const CYAN2: Self = Self(0, 238, 238);
    pub const RED1: Self = Self(255, 0, 0);
    pub const VIOLET: Self = Self(238, 130, 238);
}

/// Extra movement triggered by landing on a special square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Effect {
    /// Move one more square forward
    #[display("Advance 1")]
    AdvanceOne,
    /// Move one square back, never below the start
    #[display("Back 1")]
    RetreatOne,
}

impl Effect {
    /// Applies the effect to a square counter
    pub fn apply(self, square: usize) -> usize {
        match self {
            Self::AdvanceOne => square.saturating_add(1),
            Self::RetreatOne => square.saturating_sub(1),
        }
    }
}

/// Display description of one square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    /// Top-left corner of the square in presentation coordinates
    pub position: (i32, i32),
    /// Fill color of the square
    pub color: Color,
}

impl Square {
    /// Creates a square at `(x, y)` with the given color
    pub const fn new(x: i32, y: i32, color: Color) -> Self {
        Self {
            position: (x, y),
            color,
        }
    }
}

/// Checks that every special square lies on the board
fn specials_within(
    square_count: usize,
) -> impl FnOnce(&BTreeMap<usize, Effect>, &()) -> garde::Result {
    move |specials, _| match specials.keys().find(|&&index| index >= square_count) {
        Some(index) => Err(garde::Error::new(format!(
            "special square {index} is outside the board of {square_count} squares"
        ))),
        None => Ok(()),
    }
}

/// Immutable board configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Board {
    /// Squares in the order the token visits them
    #[garde(length(min = 1, max = MAX_SQUARE_COUNT))]
    squares: Vec<Square>,
    /// Square count at which the race is won
    #[garde(range(min = 1))]
    finish_index: usize,
    /// Special squares keyed by index
    #[garde(custom(specials_within(self.squares.len())))]
    #[serde(default)]
    specials: BTreeMap<usize, Effect>,
}

impl Board {
    /// Creates a board, see [`Board::validate`] for the constraints it must meet
    pub fn new(
        squares: Vec<Square>,
        finish_index: usize,
        specials: impl IntoIterator<Item = (usize, Effect)>,
    ) -> Self {
        Self {
            squares,
            finish_index,
            specials: specials.into_iter().collect(),
        }
    }

    /// The board shipped with the game: sixteen squares laid out in two rows
    /// that snake back toward the start, one forward and one backward
    /// special square, and a finish just past the last square
    pub fn standard() -> Self {
        use Color as C;

        let squares = vec![
            Square::new(128, 320, C::ORANGE),
            Square::new(203, 320, C::GREEN),
            Square::new(278, 320, C::YELLOW1),
            Square::new(353, 320, C::CYAN2),
            Square::new(428, 320, C::RED1),
            Square::new(503, 320, C::VIOLET),
            Square::new(578, 320, C::YELLOW2),
            Square::new(653, 320, C::GREEN),
            Square::new(653, 420, C::GREEN),
            Square::new(578, 420, C::YELLOW2),
            Square::new(503, 420, C::VIOLET),
            Square::new(428, 420, C::RED1),
            Square::new(353, 420, C::CYAN2),
            Square::new(278, 420, C::YELLOW1),
            Square::new(203, 420, C::GREEN),
            Square::new(128, 420, C::ORANGE),
        ];

        Self::new(
            squares,
            17,
            [(5, Effect::AdvanceOne), (12, Effect::RetreatOne)],
        )
    }

    /// Number of drawn squares
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    /// Whether the board has no squares
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// The square at `index`, if it is drawn
    pub fn square(&self, index: usize) -> Option<&Square> {
        self.squares.get(index)
    }

    /// Iterates over the drawn squares in order
    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    /// Square count at which the race is won
    pub fn finish_index(&self) -> usize {
        self.finish_index
    }

    /// Whether a token that advanced `square` squares has finished
    pub fn is_finish(&self, square: usize) -> bool {
        square >= self.finish_index
    }

    /// The effect of the special square at `index`, if any
    pub fn effect_at(&self, index: usize) -> Option<Effect> {
        self.specials.get(&index).copied()
    }

    /// Iterates over the special squares in index order
    pub fn specials(&self) -> impl Iterator<Item = (usize, Effect)> + '_ {
        self.specials.iter().map(|(index, effect)| (*index, *effect))
    }

    /// The drawn square the token occupies after advancing `square` squares.
    ///
    /// The token stays on the last square once the counter runs past the board.
    pub fn token_square(&self, square: usize) -> usize {
        square.min(self.squares.len().saturating_sub(1))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_standard_board() {
        let board = Board::standard();

        assert!(board.validate().is_ok());
        assert_eq!(board.len(), 16);
        assert_eq!(board.finish_index(), 17);
        assert_eq!(board.effect_at(5), Some(Effect::AdvanceOne));
        assert_eq!(board.effect_at(12), Some(Effect::RetreatOne));
        assert_eq!(board.effect_at(6), None);
        assert_eq!(board.specials().count(), 2);
    }

    #[test]
    fn test_standard_board_finish_lies_past_last_square() {
        let board = Board::standard();

        assert!(board.finish_index() > board.len() - 1);
        assert!(!board.is_finish(15));
        assert!(!board.is_finish(16));
        assert!(board.is_finish(17));
        assert!(board.is_finish(18));
    }

    #[test]
    fn test_token_square_is_clamped() {
        let board = Board::standard();

        assert_eq!(board.token_square(0), 0);
        assert_eq!(board.token_square(15), 15);
        assert_eq!(board.token_square(17), 15);
        assert_eq!(board.token_square(100), 15);
    }

    #[test]
    fn test_effect_apply() {
        assert_eq!(Effect::AdvanceOne.apply(5), 6);
        assert_eq!(Effect::RetreatOne.apply(12), 11);
        assert_eq!(Effect::RetreatOne.apply(0), 0);
        assert_eq!(Effect::AdvanceOne.apply(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_effect_display() {
        assert_eq!(Effect::AdvanceOne.to_string(), "Advance 1");
        assert_eq!(Effect::RetreatOne.to_string(), "Back 1");
    }

    #[test]
    fn test_board_special_outside_is_invalid() {
        let board = Board::new(
            vec![Square::new(0, 0, Color::GREEN); 4],
            3,
            [(4, Effect::AdvanceOne)],
        );
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_board_without_squares_is_invalid() {
        let board = Board::new(vec![], 3, []);
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_board_zero_finish_is_invalid() {
        let board = Board::new(vec![Square::new(0, 0, Color::GREEN)], 0, []);
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_board_json_round_trip_keeps_specials() {
        let board = Board::standard();
        let json = serde_json::to_string(&board).unwrap();
        let parsed: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, board);
    }

    #[test]
    fn test_board_specials_default_to_empty() {
        let json = r#"{ "squares": [{ "position": [0, 0], "color": [1, 2, 3] }], "finish_index": 1 }"#;
        let board: Board = serde_json::from_str(json).unwrap();

        assert!(board.validate().is_ok());
        assert_eq!(board.specials().count(), 0);
        assert_eq!(board.square(0).map(|s| s.color), Some(Color(1, 2, 3)));
    }
}
