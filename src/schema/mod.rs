//! Schema registry for Curadoria
//!
//! The registry is closed: every enumeration is a Rust enum whose variants
//! map one-to-one onto the tokens contributors write in fragment files.
//! Adding a token means adding a variant.
//!
//! - [`tokens`] - the six enumerations (subject, format, language,
//!   learning style, pace, difficulty)
//! - [`material`] - the `Material` and `Comment` record shapes

use std::fmt;

mod material;
#[macro_use]
mod registry;
mod tokens;

pub use material::{keys, Comment, Material};
pub use tokens::{Difficulty, Format, Language, LearningStyle, Pace, Subject};

/// A closed enumeration of string tokens
pub trait Token: Copy + Ord + fmt::Display + 'static {
    /// Human-readable name of the enumeration ("subject", "format", ...)
    const KIND: &'static str;

    /// Every variant, in registry order
    const ALL: &'static [Self];

    /// The token as written in fragment files
    fn as_str(&self) -> &'static str;

    /// Look up a token by exact, case-sensitive match
    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == token)
    }

    /// All allowed tokens, in registry order
    fn allowed() -> Vec<&'static str> {
        Self::ALL.iter().map(Token::as_str).collect()
    }
}

/// A token that is not part of its enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{token}' (allowed: {})", .allowed.join(", "))]
pub struct UnknownToken {
    pub kind: &'static str,
    pub token: String,
    pub allowed: Vec<&'static str>,
}

impl UnknownToken {
    pub fn new<T: Token>(token: &str) -> Self {
        Self {
            kind: T::KIND,
            token: token.to_string(),
            allowed: T::allowed(),
        }
    }
}

/// Description of one registry enumeration, used for listing
#[derive(Debug, Clone)]
pub struct Enumeration {
    pub kind: &'static str,
    pub field: &'static str,
    pub tokens: Vec<&'static str>,
}

/// Every enumeration in the registry together with the record key it backs
pub fn enumerations() -> Vec<Enumeration> {
    fn entry<T: Token>(field: &'static str) -> Enumeration {
        Enumeration {
            kind: T::KIND,
            field,
            tokens: T::allowed(),
        }
    }

    vec![
        entry::<Subject>(keys::SUBJECTS),
        entry::<Format>(keys::FORMAT),
        entry::<Pace>(keys::PACE),
        entry::<LearningStyle>(keys::LEARNING_STYLE),
        entry::<Language>(keys::LANGUAGE),
        entry::<Difficulty>(keys::DIFFICULTY),
    ]
}
