//! Query engine for Curadoria
//!
//! Searches, filters and sorts the aggregate. Queries are plain values and
//! execution only borrows the dataset, so any number of callers can query
//! the same materials at once.

mod executor;
pub mod fields;
pub mod filter;

pub use executor::{execute, facets, Facets, SearchResult};
pub use fields::{SortField, SortKey, FIELDS};

use std::collections::BTreeSet;

use crate::schema::{Difficulty, Format, Language, LearningStyle, Pace, Subject};

/// Active predicates and sort order
///
/// Empty selections are inactive. Subjects match as a superset (a material
/// must cover every selected subject); the single-valued fields match if the
/// material's value is any of the selected ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub text: Option<String>,
    pub subjects: BTreeSet<Subject>,
    pub formats: BTreeSet<Format>,
    pub learning_styles: BTreeSet<LearningStyle>,
    pub languages: BTreeSet<Language>,
    pub difficulties: BTreeSet<Difficulty>,
    pub paces: BTreeSet<Pace>,
    pub free_only: bool,
    pub sort_by: Option<SortField>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-text search; an empty string clears it
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.is_empty()).then_some(text);
        self
    }

    pub fn subject(mut self, subject: Subject) -> Self {
        self.subjects.insert(subject);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.formats.insert(format);
        self
    }

    pub fn learning_style(mut self, style: LearningStyle) -> Self {
        self.learning_styles.insert(style);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.languages.insert(language);
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulties.insert(difficulty);
        self
    }

    pub fn pace(mut self, pace: Pace) -> Self {
        self.paces.insert(pace);
        self
    }

    pub fn free_only(mut self) -> Self {
        self.free_only = true;
        self
    }

    pub fn sort_by(mut self, field: SortField) -> Self {
        self.sort_by = Some(field);
        self
    }
}
