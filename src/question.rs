//! Trivia questions and the question bank
//!
//! Every question offers exactly three labeled choices, one of which is
//! correct. The bank is an ordered, immutable sequence that the session
//! walks through, wrapping around once the last question has been asked.

use derive_more::Display;
use enum_map::{Enum, EnumMap, enum_map};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::constants::question::{MAX_CHOICE_LENGTH, MAX_PROMPT_LENGTH, MAX_QUESTION_COUNT};

/// Label of an answer choice
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Enum, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// First choice
    #[display("a")]
    A,
    /// Second choice
    #[display("b")]
    B,
    /// Third choice
    #[display("c")]
    C,
}

type ValidationResult = garde::Result;

/// Validates that every choice carries non-blank text of bounded length
fn validate_choices(choices: &EnumMap<Label, String>) -> ValidationResult {
    for (label, text) in choices {
        if text.trim().is_empty() {
            return Err(garde::Error::new(format!("choice {label} is empty")));
        }
        if text.len() > MAX_CHOICE_LENGTH {
            return Err(garde::Error::new(format!(
                "choice {label} is longer than {MAX_CHOICE_LENGTH}"
            )));
        }
    }
    Ok(())
}

/// A single multiple-choice trivia item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// The text shown to the player
    #[garde(length(min = 1, max = MAX_PROMPT_LENGTH))]
    prompt: String,
    /// The three answer choices keyed by label
    #[garde(custom(|v, _| validate_choices(v)))]
    choices: EnumMap<Label, String>,
    /// Label of the correct choice
    #[garde(skip)]
    correct: Label,
}

impl Question {
    /// Creates a question from its prompt, the texts of choices a, b and c,
    /// and the correct label
    pub fn new(prompt: impl Into<String>, [a, b, c]: [&str; 3], correct: Label) -> Self {
        Self {
            prompt: prompt.into(),
            choices: enum_map! {
                Label::A => a.to_owned(),
                Label::B => b.to_owned(),
                Label::C => c.to_owned(),
            },
            correct,
        }
    }

    /// The question text
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The text of the choice with the given label
    pub fn choice(&self, label: Label) -> &str {
        &self.choices[label]
    }

    /// Iterates over `(label, text)` pairs in label order
    pub fn choices(&self) -> impl Iterator<Item = (Label, &str)> {
        self.choices.iter().map(|(label, text)| (label, text.as_str()))
    }

    /// Label of the correct choice
    pub fn correct(&self) -> Label {
        self.correct
    }

    /// Whether `label` answers this question correctly
    pub fn is_correct(&self, label: Label) -> bool {
        self.correct == label
    }
}

/// Ordered sequence of questions presented during a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(transparent)]
pub struct QuestionBank {
    #[garde(length(min = 1, max = MAX_QUESTION_COUNT), dive)]
    questions: Vec<Question>,
}

impl From<Vec<Question>> for QuestionBank {
    fn from(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

impl QuestionBank {
    /// Number of questions in the bank
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the bank has no questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Index of the question that follows `index`, wrapping to the first
    /// question after the last one
    pub fn next_index(&self, index: usize) -> usize {
        match self.questions.len() {
            0 => 0,
            len => (index + 1) % len,
        }
    }

    /// Iterates over the questions in order
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// The built-in question set shipped with the game
    pub fn standard() -> Self {
        use Label::{A, B, C};

        vec![
            Question::new("How many bits are in a byte?", ["4", "8", "16"], B),
            Question::new(
                "What is the capital of Argentina?",
                ["Cordoba", "Rosario", "Buenos Aires"],
                C,
            ),
            Question::new("What is 7 multiplied by 8?", ["56", "54", "64"], A),
            Question::new(
                "Which planet is closest to the Sun?",
                ["Venus", "Mercury", "Mars"],
                B,
            ),
            Question::new(
                "What does CPU stand for?",
                [
                    "Central Processing Unit",
                    "Computer Power Unit",
                    "Core Program Utility",
                ],
                A,
            ),
            Question::new(
                "Which number system uses only 0 and 1?",
                ["Decimal", "Hexadecimal", "Binary"],
                C,
            ),
            Question::new("What is the chemical symbol for water?", ["H2O", "CO2", "O2"], A),
            Question::new(
                "How many sides does a hexagon have?",
                ["5", "6", "8"],
                B,
            ),
            Question::new(
                "Which data structure works first-in, first-out?",
                ["Stack", "Queue", "Tree"],
                B,
            ),
            Question::new(
                "What is the longest river in South America?",
                ["Amazon", "Parana", "Orinoco"],
                A,
            ),
            Question::new("What is the square root of 81?", ["8", "7", "9"], C),
            Question::new(
                "Which keyword declares a loop that checks its condition first?",
                ["while", "break", "return"],
                A,
            ),
        ]
        .into()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}
