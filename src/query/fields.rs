//! Field table
//!
//! Free-text search, sorting and rendering all walk this one table instead
//! of reflecting over `Material`. Each entry knows how to turn its field
//! into text; sortable entries also name their [`SortField`].

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::schema::{keys, Material, Token};

/// One searchable field of a material
pub struct Field {
    /// Record key
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Textual form used for search and display
    pub render: fn(&Material) -> String,
    pub sort: Option<SortField>,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sort", &self.sort)
            .finish()
    }
}

/// Every logical field, in record order
pub static FIELDS: &[Field] = &[
    Field {
        key: keys::TITLE,
        label: "Title",
        render: |m| m.title.clone(),
        sort: Some(SortField::Title),
    },
    Field {
        key: keys::AUTHOR,
        label: "Author",
        render: |m| m.author.clone(),
        sort: Some(SortField::Author),
    },
    Field {
        key: keys::URL,
        label: "URL",
        render: |m| m.url.clone(),
        sort: None,
    },
    Field {
        key: keys::SUBJECTS,
        label: "Subjects",
        render: |m| join_tokens(m.subjects.iter()),
        sort: Some(SortField::Subjects),
    },
    Field {
        key: keys::FORMAT,
        label: "Format",
        render: |m| m.format.to_string(),
        sort: Some(SortField::Format),
    },
    Field {
        key: keys::MINUTES_REQUIRED,
        label: "Minutes required",
        render: |m| m.minutes_required.to_string(),
        sort: Some(SortField::MinutesRequired),
    },
    Field {
        key: keys::PREREQUISITES,
        label: "Prerequisites",
        render: |m| join_tokens(m.prerequisites.iter()),
        sort: Some(SortField::Prerequisites),
    },
    Field {
        key: keys::PACE,
        label: "Pace",
        render: |m| m.pace.to_string(),
        sort: Some(SortField::Pace),
    },
    Field {
        key: keys::LEARNING_STYLE,
        label: "Learning style",
        render: |m| m.learning_style.to_string(),
        sort: Some(SortField::LearningStyle),
    },
    Field {
        key: keys::LANGUAGE,
        label: "Language",
        render: |m| m.language.to_string(),
        sort: Some(SortField::Language),
    },
    Field {
        key: keys::DIFFICULTY,
        label: "Difficulty",
        render: |m| m.difficulty.to_string(),
        sort: Some(SortField::Difficulty),
    },
    Field {
        key: keys::IS_FREE,
        label: "Free",
        render: |m| m.is_free.to_string(),
        sort: Some(SortField::IsFree),
    },
    Field {
        key: keys::RECOMMENDED_BY,
        label: "Recommended by",
        render: |m| join_strings(m.recommended_by.iter().map(String::as_str)),
        sort: Some(SortField::RecommendedBy),
    },
    Field {
        key: keys::COMMENTS,
        label: "Comments",
        render: |m| {
            m.comments
                .iter()
                .map(|c| format!("{}: {}", c.author, c.text))
                .collect::<Vec<_>>()
                .join(" | ")
        },
        sort: None,
    },
];

/// Textual form of a token set: tokens sorted and comma-joined
fn join_tokens<'a, T: Token>(tokens: impl Iterator<Item = &'a T>) -> String {
    join_strings(tokens.map(|t| t.as_str()))
}

fn join_strings<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let mut items: Vec<&str> = items.collect();
    items.sort_unstable();
    items.join(", ")
}

/// Field a search result can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Title,
    Author,
    Subjects,
    Format,
    MinutesRequired,
    Prerequisites,
    Pace,
    LearningStyle,
    Language,
    Difficulty,
    IsFree,
    RecommendedBy,
}

/// Comparable value of one sort field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(u32),
    Flag(bool),
    Text(String),
}

impl SortField {
    pub const ALL: &'static [SortField] = &[
        SortField::Title,
        SortField::Author,
        SortField::Subjects,
        SortField::Format,
        SortField::MinutesRequired,
        SortField::Prerequisites,
        SortField::Pace,
        SortField::LearningStyle,
        SortField::Language,
        SortField::Difficulty,
        SortField::IsFree,
        SortField::RecommendedBy,
    ];

    /// Command-line name
    pub fn name(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::Subjects => "subjects",
            SortField::Format => "format",
            SortField::MinutesRequired => "minutes",
            SortField::Prerequisites => "prerequisites",
            SortField::Pace => "pace",
            SortField::LearningStyle => "learning-style",
            SortField::Language => "language",
            SortField::Difficulty => "difficulty",
            SortField::IsFree => "free",
            SortField::RecommendedBy => "recommended-by",
        }
    }

    /// Table entry this sort field reads from
    pub fn field(&self) -> Option<&'static Field> {
        FIELDS.iter().find(|f| f.sort == Some(*self))
    }

    /// Natural ordering key: numeric for minutes, lexicographic otherwise
    pub fn key(&self, material: &Material) -> SortKey {
        match self {
            SortField::MinutesRequired => SortKey::Number(material.minutes_required),
            SortField::IsFree => SortKey::Flag(material.is_free),
            _ => SortKey::Text(
                self.field()
                    .map(|f| (f.render)(material))
                    .unwrap_or_default(),
            ),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortField {
    type Err = Error;

    /// Accepts the command-line name or the record key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s || f.field().map(|x| x.key) == Some(s))
            .ok_or_else(|| Error::InvalidQuery {
                message: format!(
                    "cannot sort by '{}' (expected one of: {})",
                    s,
                    SortField::ALL
                        .iter()
                        .map(SortField::name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}
