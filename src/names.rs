//! Player name validation and generation
//!
//! The name typed at the end of a race is trimmed and checked before it
//! reaches the score table. A blank name is replaced by a generated one so
//! that every finished race still produces a readable entry.

use garde::Validate;
use heck::ToTitleCase;
use rustrict::CensorStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::names::MAX_LENGTH;

/// Defines the style of automatically generated player names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub enum NameStyle {
    /// Roman-style names (praenomen + nomen, optionally + cognomen)
    Roman(#[garde(range(min = 2, max = 3))] usize),
    /// Pet-style names (adjective + animal combinations)
    Petname(#[garde(range(min = 2, max = 3))] usize),
}

impl Default for NameStyle {
    /// Default name style is Petname with 2 words
    fn default() -> Self {
        Self::Petname(2)
    }
}

impl NameStyle {
    /// Generates a random name according to this style
    pub fn get_name(&self) -> String {
        match self {
            Self::Roman(count) => romanname::romanname(romanname::NameConfig {
                praenomen: *count > 2,
            }),
            Self::Petname(count) => petname::petname(*count as u8, " ").unwrap_or_default(),
        }
        .to_title_case()
    }
}

/// Errors that can occur while validating a player name
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The name contains inappropriate content
    #[error("name is inappropriate")]
    Sinful,
    /// The name exceeds the maximum allowed length
    #[error("name is too long")]
    TooLong,
}

/// Turns the raw text typed by the player into the name to record
///
/// Surrounding whitespace is removed before any check. A name that is empty
/// afterwards is replaced by one generated in `style`.
///
/// # Errors
///
/// * `Error::TooLong` - Name exceeds 30 bytes
/// * `Error::Sinful` - Name contains inappropriate content
pub fn resolve(raw: &str, style: NameStyle) -> Result<String, Error> {
    let name = rustrict::trim_whitespace(raw);
    if name.is_empty() {
        return Ok(style.get_name());
    }
    if name.len() > MAX_LENGTH {
        return Err(Error::TooLong);
    }
    if name.is_inappropriate() {
        return Err(Error::Sinful);
    }
    Ok(name.to_owned())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_valid_name() {
        assert_eq!(resolve("Ana", NameStyle::default()), Ok("Ana".to_string()));
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        assert_eq!(
            resolve("  Bob \t", NameStyle::default()),
            Ok("Bob".to_string())
        );
    }

    #[test]
    fn test_resolve_too_long() {
        let long_name = "a".repeat(MAX_LENGTH + 1);
        assert_eq!(
            resolve(&long_name, NameStyle::default()),
            Err(Error::TooLong)
        );

        let max_name = "a".repeat(MAX_LENGTH);
        assert_eq!(resolve(&max_name, NameStyle::default()), Ok(max_name));
    }

    #[test]
    fn test_resolve_measures_length_after_trimming() {
        let padded = format!("{:>31}", "Ana");
        assert_eq!(resolve(&padded, NameStyle::default()), Ok("Ana".to_string()));

        let padded_long = format!("  {}  ", "a".repeat(MAX_LENGTH + 1));
        assert_eq!(
            resolve(&padded_long, NameStyle::default()),
            Err(Error::TooLong)
        );
    }

    #[test]
    fn test_resolve_blank_generates_name() {
        for raw in ["", "   ", "\t\n"] {
            let name = resolve(raw, NameStyle::Petname(2)).unwrap();
            assert!(!name.trim().is_empty());
        }
    }

    #[test]
    fn test_resolve_rejects_inappropriate() {
        assert_eq!(
            resolve("fuck", NameStyle::default()),
            Err(Error::Sinful)
        );
    }

    #[test]
    fn test_name_style_generates_names() {
        assert!(!NameStyle::Petname(2).get_name().is_empty());
        assert!(!NameStyle::Petname(3).get_name().is_empty());
        assert!(!NameStyle::Roman(2).get_name().is_empty());
        assert!(!NameStyle::Roman(3).get_name().is_empty());
    }

    #[test]
    fn test_name_style_validation() {
        assert!(NameStyle::Petname(2).validate().is_ok());
        assert!(NameStyle::Roman(3).validate().is_ok());
        assert!(NameStyle::Petname(1).validate().is_err());
        assert!(NameStyle::Roman(4).validate().is_err());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(Error::Sinful.to_string(), "name is inappropriate");
        assert_eq!(Error::TooLong.to_string(), "name is too long");
    }
}
