//! Predicate evaluation

use std::collections::BTreeSet;

use super::fields::FIELDS;
use super::Query;
use crate::schema::Material;

/// Check a material against every active predicate of `query`
pub fn evaluate(query: &Query, material: &Material) -> bool {
    matches_text(query.text.as_deref(), material)
        && query.subjects.is_subset(&material.subjects)
        && member(&query.formats, &material.format)
        && member(&query.learning_styles, &material.learning_style)
        && member(&query.languages, &material.language)
        && member(&query.difficulties, &material.difficulty)
        && member(&query.paces, &material.pace)
        && (!query.free_only || material.is_free)
}

/// Case-insensitive substring match over the textual form of every field
pub fn matches_text(text: Option<&str>, material: &Material) -> bool {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return true;
    };
    let needle = text.to_lowercase();

    FIELDS
        .iter()
        .any(|field| (field.render)(material).to_lowercase().contains(&needle))
}

/// An empty selection is inactive and lets everything through
fn member<T: Ord>(selected: &BTreeSet<T>, value: &T) -> bool {
    selected.is_empty() || selected.contains(value)
}
