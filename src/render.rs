//! Plain-text rendering of search results

use std::fmt::Write as _;

use crate::config::Config;
use crate::query::{SearchResult, FIELDS};
use crate::schema::{keys, Material};

/// Link builders for contribution and profile pages
#[derive(Debug, Clone)]
pub struct Links {
    edit_base: String,
    profile_base: String,
}

impl Links {
    pub fn new(edit_base: impl Into<String>, profile_base: impl Into<String>) -> Self {
        Self {
            edit_base: edit_base.into(),
            profile_base: profile_base.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.edit_base_url, &config.profile_base_url)
    }

    /// Page where a contributor can edit the fragment a material came from
    pub fn edit_url(&self, source_path: &str) -> String {
        join_url(&self.edit_base, source_path)
    }

    pub fn profile_url(&self, user: &str) -> String {
        join_url(&self.profile_base, user)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Render one material: its fields, links and comments
pub fn material(material: &Material, links: &Links) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", material.title);

    for field in FIELDS {
        if field.key == keys::TITLE || field.key == keys::COMMENTS {
            continue;
        }
        let value = (field.render)(material);
        let value = if value.is_empty() { "-".to_string() } else { value };
        let _ = writeln!(out, "  {}: {}", field.label, value);
    }

    for user in &material.recommended_by {
        let _ = writeln!(out, "  @{} <{}>", user, links.profile_url(user));
    }
    let _ = writeln!(out, "  Recommend or comment: {}", links.edit_url(&material.source_path));

    let _ = writeln!(out, "  Comments ({})", material.comments.len());
    for comment in &material.comments {
        let _ = writeln!(
            out,
            "    @{} <{}>: {}",
            comment.author,
            links.profile_url(&comment.author),
            comment.text
        );
    }

    out
}

/// Render a whole result set, or the empty-state message
pub fn results(result: &SearchResult<'_>, links: &Links) -> String {
    if result.is_empty() {
        return "No results found.\n".to_string();
    }

    let mut out = format!("{} material(s) found\n\n", result.count);
    for m in &result.materials {
        out.push_str(&material(m, links));
        out.push('\n');
    }
    out
}
