//! Query execution engine

use serde::Serialize;
use std::collections::BTreeSet;

use super::{filter, Query};
use crate::schema::{Difficulty, Format, Language, LearningStyle, Material, Pace, Subject, Token};

/// Matching materials plus their count
#[derive(Debug, Serialize)]
pub struct SearchResult<'a> {
    pub count: usize,
    pub materials: Vec<&'a Material>,
}

impl SearchResult<'_> {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Run `query` over `materials`.
///
/// Matches keep aggregate order unless a sort field is set; sorting is
/// stable, so ties keep aggregate order too.
pub fn execute<'a>(materials: &'a [Material], query: &Query) -> SearchResult<'a> {
    let mut matches: Vec<&Material> = materials
        .iter()
        .filter(|m| filter::evaluate(query, m))
        .collect();

    if let Some(sort) = query.sort_by {
        matches.sort_by_cached_key(|m| sort.key(m));
    }

    SearchResult {
        count: matches.len(),
        materials: matches,
    }
}

/// Distinct values present in a dataset, per filterable field
///
/// These are the options a browsing interface offers in its filters.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct Facets {
    pub subjects: Vec<Subject>,
    pub formats: Vec<Format>,
    pub learning_styles: Vec<LearningStyle>,
    pub languages: Vec<Language>,
    pub difficulties: Vec<Difficulty>,
    pub paces: Vec<Pace>,
    pub free: usize,
    pub total: usize,
}

/// Collect facets, each list sorted by token text
pub fn facets(materials: &[Material]) -> Facets {
    fn sorted<T: Token>(values: BTreeSet<T>) -> Vec<T> {
        let mut values: Vec<T> = values.into_iter().collect();
        values.sort_by_key(|v| v.as_str());
        values
    }

    Facets {
        subjects: sorted(materials.iter().flat_map(|m| m.subjects.iter().copied()).collect()),
        formats: sorted(materials.iter().map(|m| m.format).collect()),
        learning_styles: sorted(materials.iter().map(|m| m.learning_style).collect()),
        languages: sorted(materials.iter().map(|m| m.language).collect()),
        difficulties: sorted(materials.iter().map(|m| m.difficulty).collect()),
        paces: sorted(materials.iter().map(|m| m.pace).collect()),
        free: materials.iter().filter(|m| m.is_free).count(),
        total: materials.len(),
    }
}
